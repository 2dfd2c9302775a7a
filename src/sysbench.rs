//! Command-line construction for the sysbench workload categories.
//!
//! Every benchmark is one sysbench child process; this module knows the
//! argument shape of each category and nothing about artifacts, markers, or
//! repetition counts. The CPU, memory, and file I/O run commands carry a
//! `--num-threads` matched to the machine's core count so the workload keeps
//! every core busy; the thread category sets its own, deliberately
//! oversubscribed, count because thread scheduling is the workload itself.
//!
//! # Examples
//!
//! ```
//! use machine_bench::sysbench::Tool;
//!
//! let tool = Tool::with_cores("sysbench", 8);
//! let invocation = tool.cpu(20000);
//! assert_eq!(
//!     invocation.args(),
//!     ["--test=cpu", "--cpu-max-prime=20000", "--num-threads=8", "run"]
//! );
//! ```

use std::path::{Path, PathBuf};

use crate::exec::Invocation;

/// Phases of the file I/O category's on-disk lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FileIoPhase {
    /// Creates the test files the run phase reads and writes.
    Prepare,
    /// The measured random read/write workload.
    Run,
    /// Deletes the test files.
    Cleanup,
}

impl FileIoPhase {
    fn word(self) -> &'static str {
        match self {
            Self::Prepare => "prepare",
            Self::Run => "run",
            Self::Cleanup => "cleanup",
        }
    }
}

/// A located sysbench executable plus the core count its run commands are
/// sized for.
#[derive(Clone, Debug)]
pub struct Tool {
    executable: PathBuf,
    cores: usize,
}

impl Tool {
    /// Wraps `executable`, sizing run commands for this machine's logical
    /// core count.
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self::with_cores(executable, num_cpus::get())
    }

    /// Wraps `executable` with an explicit core count.
    pub fn with_cores(executable: impl Into<PathBuf>, cores: usize) -> Self {
        Self {
            executable: executable.into(),
            cores,
        }
    }

    /// The core count run commands are sized for.
    #[must_use]
    pub fn cores(&self) -> usize {
        self.cores
    }

    fn num_threads(&self) -> String {
        format!("--num-threads={}", self.cores)
    }

    /// `sysbench --test=cpu --cpu-max-prime=N --num-threads=CORES run`
    #[must_use]
    pub fn cpu(&self, max_prime: u64) -> Invocation {
        Invocation::new(
            &self.executable,
            vec![
                "--test=cpu".to_string(),
                format!("--cpu-max-prime={max_prime}"),
                self.num_threads(),
                "run".to_string(),
            ],
        )
    }

    /// `sysbench --test=memory --memory-block-size=B --memory-total-size=T
    /// --num-threads=CORES run`
    #[must_use]
    pub fn memory(&self, block_size: &str, total_size: &str) -> Invocation {
        Invocation::new(
            &self.executable,
            vec![
                "--test=memory".to_string(),
                format!("--memory-block-size={block_size}"),
                format!("--memory-total-size={total_size}"),
                self.num_threads(),
                "run".to_string(),
            ],
        )
    }

    /// `sysbench --test=threads --num-threads=N --max-time=T run`
    ///
    /// `count` is independent of the machine's cores; the default
    /// configuration oversubscribes on purpose.
    #[must_use]
    pub fn threads(&self, count: u32, max_time: &str) -> Invocation {
        Invocation::new(
            &self.executable,
            vec![
                "--test=threads".to_string(),
                format!("--num-threads={count}"),
                format!("--max-time={max_time}"),
                "run".to_string(),
            ],
        )
    }

    /// A file I/O phase in random read/write mode, run inside `workdir`.
    ///
    /// All three phases must name the same `--file-total-size` and run in the
    /// same directory, or the run phase will not find the files prepare laid
    /// down. Only the run phase takes `--num-threads`.
    #[must_use]
    pub fn fileio(&self, total_size: &str, phase: FileIoPhase, workdir: &Path) -> Invocation {
        let mut args = vec![
            "--test=fileio".to_string(),
            "--file-test-mode=rndrw".to_string(),
            format!("--file-total-size={total_size}"),
        ];
        if phase == FileIoPhase::Run {
            args.push(self.num_threads());
        }
        args.push(phase.word().to_string());
        Invocation::new(&self.executable, args).in_dir(workdir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpu_arguments() {
        let tool = Tool::with_cores("sysbench", 8);
        assert_eq!(
            tool.cpu(20000).args(),
            ["--test=cpu", "--cpu-max-prime=20000", "--num-threads=8", "run"]
        );
    }

    #[test]
    fn memory_arguments() {
        let tool = Tool::with_cores("sysbench", 8);
        assert_eq!(
            tool.memory("1K", "10G").args(),
            [
                "--test=memory",
                "--memory-block-size=1K",
                "--memory-total-size=10G",
                "--num-threads=8",
                "run"
            ]
        );
    }

    #[test]
    fn threads_arguments_ignore_the_core_count() {
        let tool = Tool::with_cores("sysbench", 8);
        assert_eq!(
            tool.threads(128, "10s").args(),
            ["--test=threads", "--num-threads=128", "--max-time=10s", "run"]
        );
    }

    #[test]
    fn every_category_targets_the_wrapped_executable() {
        let tool = Tool::with_cores("/opt/sysbench/bin/sysbench", 4);
        let expected = Path::new("/opt/sysbench/bin/sysbench");

        assert_eq!(tool.cpu(20000).program(), expected);
        assert_eq!(tool.memory("1K", "10G").program(), expected);
        assert_eq!(tool.threads(128, "10s").program(), expected);
        assert_eq!(
            tool.fileio("16G", FileIoPhase::Run, Path::new("/bench/tmp"))
                .program(),
            expected
        );
    }

    #[test]
    fn fileio_run_is_threaded_but_prepare_and_cleanup_are_not() {
        let tool = Tool::with_cores("sysbench", 8);
        let workdir = Path::new("/bench/tmp");

        assert_eq!(
            tool.fileio("16G", FileIoPhase::Prepare, workdir).args(),
            [
                "--test=fileio",
                "--file-test-mode=rndrw",
                "--file-total-size=16G",
                "prepare"
            ]
        );
        assert_eq!(
            tool.fileio("16G", FileIoPhase::Run, workdir).args(),
            [
                "--test=fileio",
                "--file-test-mode=rndrw",
                "--file-total-size=16G",
                "--num-threads=8",
                "run"
            ]
        );
        assert_eq!(
            tool.fileio("16G", FileIoPhase::Cleanup, workdir).args(),
            [
                "--test=fileio",
                "--file-test-mode=rndrw",
                "--file-total-size=16G",
                "cleanup"
            ]
        );
    }
}
