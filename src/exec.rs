//! Locating and running external executables.
//!
//! Benchmark tools run as child processes with their stdout either appended
//! to an artifact file or thrown away; stderr always passes through to the
//! console so a failing tool explains itself where the operator is looking.
//! Working directories are set per invocation, never by changing the current
//! directory of this process.

use std::{
    io,
    path::{Path, PathBuf},
    process::{Command, Stdio},
};

use anyhow::bail;

use crate::{error::InvocationFailure, sink};

/// An executable that answered a version probe.
#[derive(Clone, Debug)]
pub struct Located {
    /// Path the executable was found at.
    pub executable: PathBuf,
    /// First line of its `--version` output.
    pub version: String,
}

/// Checks that `executable` exists and runs, and reads its version.
///
/// # Errors
///
/// Fails if the executable cannot be found or does not run; the error names
/// the path that was tried so the operator knows what to install.
pub fn locate(name: &str, executable: &Path) -> anyhow::Result<Located> {
    log::trace!("validating executable {} ({name})", executable.display());
    match Command::new(executable).arg("--version").output() {
        Ok(out) => {
            let version = String::from_utf8_lossy(&out.stdout)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string();
            log::debug!("found {name} ({}): {version}", executable.display());
            Ok(Located {
                executable: executable.to_path_buf(),
                version,
            })
        }
        Err(err) => match err.kind() {
            io::ErrorKind::NotFound => {
                bail!("{name} not found, tried {}", executable.display())
            }
            _ => bail!("could not probe {name}: {err}"),
        },
    }
}

/// A fully-described child process run: program, arguments, and an optional
/// working directory.
#[derive(Clone, Debug)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<String>,
    workdir: Option<PathBuf>,
}

impl Invocation {
    /// Describes a run of `program` with `args`.
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            workdir: None,
        }
    }

    /// Runs the process with `dir` as its working directory.
    #[must_use]
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.workdir = Some(dir.into());
        self
    }

    /// The program to run.
    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// The arguments the program is run with.
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The invocation rendered as a single command line, for messages.
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    /// Runs the process, appending its stdout to the file at `target`.
    ///
    /// The file is created if missing and never truncated, so repeated
    /// captures of one artifact accumulate in run order.
    ///
    /// # Errors
    ///
    /// Fails if `target` cannot be opened, the process cannot be started, or
    /// the process exits with a non-success status. Output written before a
    /// failed exit stays in the artifact.
    pub fn capture(&self, target: &Path) -> Result<(), InvocationFailure> {
        let file = sink::append_target(target).map_err(|source| InvocationFailure::Capture {
            target: target.to_path_buf(),
            source,
        })?;
        self.execute(Stdio::from(file))
    }

    /// Runs the process, discarding its stdout.
    ///
    /// # Errors
    ///
    /// Fails if the process cannot be started or exits with a non-success
    /// status.
    pub fn discard(&self) -> Result<(), InvocationFailure> {
        self.execute(Stdio::null())
    }

    fn execute(&self, stdout: Stdio) -> Result<(), InvocationFailure> {
        log::trace!("running `{}`", self.command_line());
        let mut command = Command::new(&self.program);
        command.args(&self.args).stdout(stdout);
        if let Some(workdir) = &self.workdir {
            command.current_dir(workdir);
        }

        let status = command.status().map_err(|source| InvocationFailure::Run {
            command: self.command_line(),
            source,
        })?;
        if !status.success() {
            return Err(InvocationFailure::Exit {
                command: self.command_line(),
                status,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shell(script: &str) -> Invocation {
        Invocation::new("/bin/sh", vec!["-c".to_string(), script.to_string()])
    }

    #[test]
    #[cfg(unix)]
    fn capture_appends_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("artifact.txt");

        shell("echo captured").capture(&target).unwrap();
        shell("echo captured").capture(&target).unwrap();

        assert_eq!(
            std::fs::read_to_string(&target).unwrap(),
            "captured\ncaptured\n"
        );
    }

    #[test]
    #[cfg(unix)]
    fn nonzero_exit_is_an_error() {
        let err = shell("exit 3").discard().unwrap_err();
        match err {
            InvocationFailure::Exit { status, .. } => assert_eq!(status.code(), Some(3)),
            other => panic!("expected an exit failure, got {other}"),
        }
    }

    #[test]
    fn missing_program_is_an_error() {
        let err = Invocation::new("/no/such/program", Vec::new())
            .discard()
            .unwrap_err();
        assert!(matches!(err, InvocationFailure::Run { .. }));
    }

    #[test]
    #[cfg(unix)]
    fn in_dir_sets_the_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("artifact.txt");

        shell("pwd").in_dir(dir.path()).capture(&target).unwrap();

        let reported = std::fs::read_to_string(&target).unwrap();
        assert_eq!(
            std::fs::canonicalize(reported.trim()).unwrap(),
            std::fs::canonicalize(dir.path()).unwrap()
        );
    }

    #[test]
    fn command_line_joins_program_and_args() {
        let invocation = Invocation::new(
            "sysbench",
            vec!["--test=cpu".to_string(), "run".to_string()],
        );
        assert_eq!(invocation.command_line(), "sysbench --test=cpu run");
    }
}
