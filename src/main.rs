use std::{fs, path::PathBuf, time::Duration};

use anyhow::bail;
use clap::Parser;
use env_logger::Env;

use machine_bench::{Category, SuiteConfig};

#[derive(Parser)]
#[command(author, version, about)]
struct Args {
    /// Directory to write benchmark artifacts into
    #[arg(short, long, default_value = "machine-benchmarks")]
    output: PathBuf,

    /// Repetitions of every benchmark category
    #[arg(short = 'n', long, default_value_t = 10)]
    repetitions: usize,

    /// The sysbench executable to drive
    #[arg(long, default_value = "sysbench")]
    sysbench: PathBuf,

    /// Category to run (cpu, memory, threads, fileio); repeatable, all when omitted
    #[arg(short, long = "category")]
    categories: Vec<String>,

    /// Seconds to pause between repetitions
    #[arg(long, default_value_t = 1)]
    pause: u64,

    /// Upper bound of the CPU category's prime search
    #[arg(long, default_value_t = 20000)]
    cpu_max_prime: u64,

    /// Transfer block size of the memory category
    #[arg(long, default_value = "1K")]
    memory_block_size: String,

    /// Total transfer volume of the memory category
    #[arg(long, default_value = "10G")]
    memory_total_size: String,

    /// Thread count of the thread category
    #[arg(long, default_value_t = 128)]
    thread_count: u32,

    /// Time bound of the thread category
    #[arg(long, default_value = "10s")]
    thread_max_time: String,

    /// Total size of the file I/O category's test files
    #[arg(long, default_value = "16G")]
    file_total_size: String,
}

impl Args {
    fn into_config(self) -> anyhow::Result<SuiteConfig> {
        let categories = if self.categories.is_empty() {
            Category::ALL.to_vec()
        } else {
            let mut categories = Vec::new();
            for name in &self.categories {
                let Some(category) = Category::from_name(name) else {
                    bail!("unknown benchmark category `{name}` (expected cpu, memory, threads, or fileio)");
                };
                if !categories.contains(&category) {
                    categories.push(category);
                }
            }
            categories
        };

        Ok(SuiteConfig {
            root: self.output,
            repetitions: self.repetitions,
            sysbench: self.sysbench,
            categories,
            pause: Duration::from_secs(self.pause),
            cpu_max_prime: self.cpu_max_prime,
            memory_block_size: self.memory_block_size,
            memory_total_size: self.memory_total_size,
            thread_count: self.thread_count,
            thread_max_time: self.thread_max_time,
            file_total_size: self.file_total_size,
        })
    }
}

fn main() -> anyhow::Result<()> {
    human_panic::setup_panic!();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Args::parse().into_config()?;

    let report = machine_bench::run(&config).map_err(|err| {
        log::error!("{err}");
        err
    })?;

    let report_path = config.root.join(format!(
        "machine-bench.results.{}.json",
        report.started_at.format("%Y-%m-%dT%H-%M-%S")
    ));
    log::info!(
        "writing run report to {}...",
        report_path.to_string_lossy()
    );
    match serde_json::to_string_pretty(&report) {
        Ok(output) => {
            if let Err(err) = fs::write(&report_path, output) {
                log::warn!(
                    "could not write run report {}: {err}, continuing...",
                    report_path.to_string_lossy()
                );
            }
        }
        Err(err) => log::warn!("could not serialize the run report: {err}, continuing..."),
    }

    Ok(())
}
