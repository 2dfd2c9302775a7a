//! Error taxonomy for a benchmark run.
//!
//! Only [`StorageError`] is fatal, and only when it comes out of the initial
//! run-root reset: a run must never start on top of a previous run's
//! artifacts. Everything that goes wrong after benchmarking has begun is an
//! [`InvocationFailure`], which the orchestrator logs and walks past so a
//! single bad repetition cannot abort the whole suite.

use std::{io, path::PathBuf, process::ExitStatus};

use thiserror::Error;

/// A directory under the run root could not be created or removed.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Creating a directory (or one of its parents) failed.
    #[error("could not create directory {}: {source}", path.display())]
    Create {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying filesystem error.
        source: io::Error,
    },

    /// Recursively removing a directory failed.
    #[error("could not remove directory {}: {source}", path.display())]
    Remove {
        /// The directory that could not be removed.
        path: PathBuf,
        /// The underlying filesystem error.
        source: io::Error,
    },
}

/// A single external invocation did not complete cleanly.
///
/// Whatever output the process managed to produce before failing has already
/// been appended to its artifact by the time this is returned.
#[derive(Debug, Error)]
pub enum InvocationFailure {
    /// The artifact file backing the capture could not be opened.
    #[error("could not open {} for capture: {source}", target.display())]
    Capture {
        /// The artifact file that could not be opened for appending.
        target: PathBuf,
        /// The underlying filesystem error.
        source: io::Error,
    },

    /// The process could not be started or waited on.
    #[error("could not run `{command}`: {source}")]
    Run {
        /// The command line that failed to run.
        command: String,
        /// The underlying OS error.
        source: io::Error,
    },

    /// The process ran to completion but reported failure.
    #[error("`{command}` exited with {status}")]
    Exit {
        /// The command line that was run.
        command: String,
        /// The non-success exit status.
        status: ExitStatus,
    },

    /// The invocation's working area could not be set up or torn down.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_names_the_path() {
        let err = StorageError::Create {
            path: PathBuf::from("/nope/benchmarks"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("/nope/benchmarks"));
    }

    #[test]
    fn invocation_failure_names_the_command() {
        let err = InvocationFailure::Run {
            command: "sysbench --test=cpu run".to_string(),
            source: io::Error::from(io::ErrorKind::NotFound),
        };
        assert!(err.to_string().contains("sysbench --test=cpu run"));
    }
}
