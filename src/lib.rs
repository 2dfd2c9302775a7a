//! Records a reproducible performance baseline for a machine by driving
//! sysbench workloads.
//!
//! machine-bench runs the sysbench CPU, memory, thread, and file I/O
//! categories a fixed number of times each, appending every repetition's raw
//! tool output to a per-category artifact file bracketed by timestamped
//! start and end markers. A run also records a plain-text host description
//! and two installed-package inventories, so the numbers stay interpretable
//! long after the machine they came from is gone. When every category has
//! finished, all artifacts are replayed to the console and a JSON run report
//! is written next to them.
//!
//! A single failing repetition never aborts a run: the failure is logged,
//! counted, and walked past, because a baseline with one hole beats no
//! baseline at all.
//!
//! # Artifacts
//! One run produces, under the output directory:
//! - `machine-specs.txt`, the host description
//! - `python-local-modules.txt` and `python-virtualenv-modules.txt`, the
//!   package inventories
//! - `machine-sysbench-{cpu,memory,threads,file}.txt`, one per category,
//!   each holding `N` marker-bracketed sections of raw tool output
//! - `machine-bench.results.<timestamp>.json`, the run report
//!
//! # Usage
//! machine-bench is primarily designed to be used as an executable, but the
//! pieces are modular and can be driven as a library for more granular
//! control over what runs and where the artifacts go.
//!
//! ## As an executable
//! Refer to the output of the `--help` flag for information on how to use
//! the machine-bench binary:
//! ```console
//! $ cargo install machine-bench
//! $ machine-bench --help
//! machine-bench drives sysbench CPU, memory, thread, and file I/O workloads to record a reproducible performance baseline for a machine.
//!
//! Usage: machine-bench [OPTIONS]
//!
//! Options:
//!   -o, --output <OUTPUT>                        Directory to write benchmark artifacts into [default: machine-benchmarks]
//!   -n, --repetitions <REPETITIONS>              Repetitions of every benchmark category [default: 10]
//!       --sysbench <SYSBENCH>                    The sysbench executable to drive [default: sysbench]
//!   -c, --category <CATEGORIES>                  Category to run (cpu, memory, threads, fileio); repeatable, all when omitted
//!       --pause <PAUSE>                          Seconds to pause between repetitions [default: 1]
//!       --cpu-max-prime <CPU_MAX_PRIME>          Upper bound of the CPU category's prime search [default: 20000]
//!       --memory-block-size <MEMORY_BLOCK_SIZE>  Transfer block size of the memory category [default: 1K]
//!       --memory-total-size <MEMORY_TOTAL_SIZE>  Total transfer volume of the memory category [default: 10G]
//!       --thread-count <THREAD_COUNT>            Thread count of the thread category [default: 128]
//!       --thread-max-time <THREAD_MAX_TIME>      Time bound of the thread category [default: 10s]
//!       --file-total-size <FILE_TOTAL_SIZE>      Total size of the file I/O category's test files [default: 16G]
//!   -h, --help                                   Print help
//!   -V, --version                                Print version
//! ```
//!
//! Note that sysbench itself is not shipped with the binary; install it
//! from your platform's package manager first.
//!
//! ## As a library
//! ```no_run
//! use machine_bench::{run, SuiteConfig};
//!
//! let report = run(&SuiteConfig::default()).expect("could not run the benchmark suite");
//! println!("completed {} categories", report.categories.len());
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]

pub mod benchmarks;
pub mod error;
pub mod exec;
pub mod host;
pub mod sink;
pub mod store;
pub mod suite;
pub mod sysbench;

pub use benchmarks::Category;
pub use suite::{run, SuiteConfig, SuiteReport};
