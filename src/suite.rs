//! Orchestration for a full benchmark run.
//!
//! The suite is strictly sequential: one category at a time, one repetition
//! at a time, with the calling thread blocking on every child process so
//! repetitions never interfere with each other. The primary entrypoint is
//! [`run`], which resets the run root, records the host description and
//! package inventories, drives every configured category through its
//! repetitions, and finally replays every artifact to the console.
//!
//! Only two things abort a run before it finishes: a benchmark tool that
//! cannot be found, and a run root that cannot be reset. Every failure after
//! that is logged and walked past, and the [`SuiteReport`] records how many
//! repetitions each category actually completed.
//!
//! # Examples
//!
//! ```no_run
//! use machine_bench::{run, SuiteConfig};
//!
//! let report = run(&SuiteConfig::default()).expect("could not run the benchmark suite");
//! println!("finished {} categories", report.categories.len());
//! ```

use std::{
    io,
    path::{Path, PathBuf},
    thread,
    time::Duration,
};

use anyhow::Context;
use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    benchmarks::{fileio::FileIoLifecycle, Category},
    error::InvocationFailure,
    exec,
    host::{self, PackageScope},
    sink,
    store::{self, Artifact, RunRoot},
    sysbench::Tool,
};

/// Everything a benchmark run is parameterized by.
///
/// The defaults reproduce the standard baseline run: ten repetitions of
/// every category with the stock workload sizes.
#[derive(Clone, Debug)]
pub struct SuiteConfig {
    /// Directory the run root is (re)created at.
    pub root: PathBuf,
    /// Repetitions of every category.
    pub repetitions: usize,
    /// The sysbench executable to drive.
    pub sysbench: PathBuf,
    /// Categories to run, in [`Category::ALL`] order regardless of the
    /// order given here.
    pub categories: Vec<Category>,
    /// Pause between repetitions.
    pub pause: Duration,
    /// Upper bound of the CPU category's prime search.
    pub cpu_max_prime: u64,
    /// Transfer block size of the memory category.
    pub memory_block_size: String,
    /// Total transfer volume of the memory category.
    pub memory_total_size: String,
    /// Thread count of the thread category, oversubscribed on purpose.
    pub thread_count: u32,
    /// Time bound of the thread category.
    pub thread_max_time: String,
    /// Total size of the file I/O category's test files.
    pub file_total_size: String,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("machine-benchmarks"),
            repetitions: 10,
            sysbench: PathBuf::from("sysbench"),
            categories: Category::ALL.to_vec(),
            pause: Duration::from_secs(1),
            cpu_max_prime: 20000,
            memory_block_size: "1K".to_string(),
            memory_total_size: "10G".to_string(),
            thread_count: 128,
            thread_max_time: "10s".to_string(),
            file_total_size: "16G".to_string(),
        }
    }
}

/// What a run did, written alongside the artifacts as JSON.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuiteReport {
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// When the run finished.
    pub finished_at: DateTime<Utc>,
    /// The benchmark executable that was driven.
    pub tool: String,
    /// Its reported version line.
    pub tool_version: String,
    /// Repetitions every category was asked for.
    pub repetitions: usize,
    /// Per-category outcomes, in execution order.
    pub categories: Vec<CategoryReport>,
}

/// Outcome of one category's repetitions.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CategoryReport {
    /// The category.
    pub category: Category,
    /// File name of its artifact under the run root.
    pub artifact: String,
    /// Repetitions that completed cleanly.
    pub completed: usize,
    /// Repetitions that failed and were walked past.
    pub failed: usize,
}

/// Runs the whole benchmark suite described by `config`.
///
/// # Errors
///
/// Fails if the benchmark executable cannot be located or the run root
/// cannot be reset; those are the only fatal conditions. Individual
/// benchmark failures are logged, counted in the report, and walked past.
pub fn run(config: &SuiteConfig) -> anyhow::Result<SuiteReport> {
    let started_at = Utc::now();

    // Preflight before reset so a missing tool cannot cost the previous
    // run's artifacts.
    let located = exec::locate("sysbench", &config.sysbench)?;
    let tool = Tool::new(&located.executable);
    let root = RunRoot::new(&config.root);

    store::reset(root.path()).context("could not reset the benchmark directory")?;

    let specs = root.artifact(Artifact::MachineSpecs);
    if let Err(err) = sink::write(&specs, &host::collect()) {
        log::warn!("could not write {}: {err}, continuing...", specs.display());
    }
    log::info!("Computer Info Complete");

    capture_inventory(&root, Artifact::LocalModules, PackageScope::All);
    capture_inventory(&root, Artifact::VirtualenvModules, PackageScope::Local);
    log::info!("Python Module Listing Complete");

    log::info!(
        "running {} repetitions of {} categories with {} cores...",
        config.repetitions,
        config.categories.len(),
        tool.cores()
    );
    let mut categories = Vec::new();
    for category in Category::ALL {
        if !config.categories.contains(&category) {
            log::debug!("[{category}] not selected, skipping...");
            continue;
        }
        categories.push(run_category(category, &tool, &root, config));
    }

    replay_all(&root);

    Ok(SuiteReport {
        started_at,
        finished_at: Utc::now(),
        tool: located.executable.display().to_string(),
        tool_version: located.version,
        repetitions: config.repetitions,
        categories,
    })
}

fn run_category(
    category: Category,
    tool: &Tool,
    root: &RunRoot,
    config: &SuiteConfig,
) -> CategoryReport {
    let artifact = root.artifact(category.artifact());
    let (completed, failed) = match category {
        Category::Cpu => run_repetitions(category, config, &artifact, |_| {
            tool.cpu(config.cpu_max_prime).capture(&artifact)
        }),
        Category::Memory => run_repetitions(category, config, &artifact, |_| {
            tool.memory(&config.memory_block_size, &config.memory_total_size)
                .capture(&artifact)
        }),
        Category::Threads => run_repetitions(category, config, &artifact, |_| {
            tool.threads(config.thread_count, &config.thread_max_time)
                .capture(&artifact)
        }),
        Category::FileIo => {
            let mut lifecycle = FileIoLifecycle::new(tool, &config.file_total_size, root.tmp());
            run_repetitions(category, config, &artifact, |index| {
                lifecycle.repetition(index, config.repetitions, &artifact)
            })
        }
    };

    CategoryReport {
        category,
        artifact: category.artifact().file_name().to_string(),
        completed,
        failed,
    }
}

/// Drives `step` through every repetition of one category, bracketing each
/// with start and end markers and pausing between repetitions.
fn run_repetitions<F>(
    category: Category,
    config: &SuiteConfig,
    artifact: &Path,
    mut step: F,
) -> (usize, usize)
where
    F: FnMut(usize) -> Result<(), InvocationFailure>,
{
    let mut completed = 0;
    let mut failed = 0;
    for index in 0..config.repetitions {
        marker(artifact, category, index, "Start");
        match step(index) {
            Ok(()) => completed += 1,
            Err(err) => {
                failed += 1;
                log::warn!("[{category}] repetition {index} failed: {err}, continuing...");
            }
        }
        marker(artifact, category, index, "End");
        log::info!(
            "{}: {} / {} complete.",
            category.label(),
            index + 1,
            config.repetitions
        );
        if !config.pause.is_zero() {
            thread::sleep(config.pause);
        }
    }
    (completed, failed)
}

/// Appends one timestamped marker line to the category artifact.
///
/// Markers bracket the tool's raw output so the artifact stays parseable
/// into per-repetition sections; a marker that cannot be written is logged
/// and forfeited rather than failing the repetition.
fn marker(artifact: &Path, category: Category, index: usize, edge: &str) {
    let line = format!(
        "{} {index} {edge}: {}\n",
        category.label(),
        Local::now().format("%Y-%m-%d %H:%M:%S%.6f")
    );
    if let Err(err) = sink::append(artifact, &line) {
        log::warn!("[{category}] could not write {edge} marker: {err}, continuing...");
    }
}

fn capture_inventory(root: &RunRoot, artifact: Artifact, scope: PackageScope) {
    let path = root.artifact(artifact);
    if let Err(err) = host::package_inventory(scope).capture(&path) {
        log::warn!(
            "could not capture a package inventory to {}: {err}, continuing...",
            path.display()
        );
    }
}

/// Echoes every artifact to the console in creation order.
fn replay_all(root: &RunRoot) {
    for artifact in Artifact::ALL {
        let path = root.artifact(artifact);
        if let Err(err) = sink::replay(&path) {
            if err.kind() == io::ErrorKind::NotFound {
                log::warn!("no {} to replay, continuing...", path.display());
            } else {
                log::warn!("could not replay {}: {err}, continuing...", path.display());
            }
        }
    }
}
