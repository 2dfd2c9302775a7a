//! Lifecycle control for the file I/O category.
//!
//! The file workload is the one category with on-disk state: the tool's
//! prepare phase lays multi-gigabyte test files down in a temporary working
//! directory, every repetition's run phase reads and writes them in place,
//! and the cleanup phase deletes them again. Re-preparing on every
//! repetition would swamp the measurement, so the lifecycle brackets the
//! whole repetition loop: prepare before the first run, cleanup after the
//! last, tracked by an explicit state value owned by the caller for exactly
//! one run.

use std::path::{Path, PathBuf};

use crate::{
    error::InvocationFailure,
    store,
    sysbench::{FileIoPhase, Tool},
};

/// Where a run's file I/O working area is in its life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    /// No prepare attempt yet; the working directory does not exist.
    NotPrepared,
    /// Prepare has been attempted; test files are (supposed to be) on disk.
    Prepared,
    /// Cleanup has been attempted and the working directory removed.
    /// Terminal.
    Cleaned,
}

/// Drives the prepare/run/cleanup protocol across the repetitions of one
/// run.
///
/// Prepare is attempted at most once, on the first repetition; cleanup is
/// attempted at most once, at the end of the final repetition whatever its
/// outcome, and the working directory is removed even when the tool's own
/// cleanup fails. Failed attempts still advance the state, so a broken
/// prepare is reported once per repetition by the run phase instead of
/// being retried with the same multi-gigabyte cost.
#[derive(Debug)]
pub struct FileIoLifecycle<'a> {
    tool: &'a Tool,
    total_size: &'a str,
    tmp: PathBuf,
    state: LifecycleState,
}

impl<'a> FileIoLifecycle<'a> {
    /// Binds a lifecycle to a tool, a `--file-total-size`, and the working
    /// directory it will create and destroy.
    pub fn new(tool: &'a Tool, total_size: &'a str, tmp: PathBuf) -> Self {
        Self {
            tool,
            total_size,
            tmp,
            state: LifecycleState::NotPrepared,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Executes repetition `index` of `repetitions`, appending run-phase
    /// output to the artifact at `artifact`.
    ///
    /// The first call also prepares the working area; the call with the
    /// final index (`repetitions - 1`) also cleans it up, after which the
    /// lifecycle is spent.
    ///
    /// # Errors
    ///
    /// Fails if any phase of this repetition fails; the caller decides
    /// whether to continue. A prepare or run failure on the final
    /// repetition still triggers cleanup, and the cleanup error, if any,
    /// is logged rather than shadowing the earlier error.
    pub fn repetition(
        &mut self,
        index: usize,
        repetitions: usize,
        artifact: &Path,
    ) -> Result<(), InvocationFailure> {
        let prepared = if self.state == LifecycleState::NotPrepared {
            self.prepare()
        } else {
            Ok(())
        };

        // A failed prepare skips the run phase but must still reach the
        // cleanup below when this is the final repetition.
        let run = prepared.and_then(|()| {
            self.tool
                .fileio(self.total_size, FileIoPhase::Run, &self.tmp)
                .capture(artifact)
        });

        if index + 1 == repetitions && self.state == LifecycleState::Prepared {
            let cleanup = self.cleanup();
            match run {
                Ok(()) => return cleanup,
                Err(_) => {
                    if let Err(err) = cleanup {
                        log::warn!("could not clean up file I/O working area: {err}, continuing...");
                    }
                }
            }
        }
        run
    }

    fn prepare(&mut self) -> Result<(), InvocationFailure> {
        self.state = LifecycleState::Prepared;
        store::ensure_dir(&self.tmp)?;
        log::debug!("preparing file I/O test files in {}", self.tmp.display());
        self.tool
            .fileio(self.total_size, FileIoPhase::Prepare, &self.tmp)
            .discard()
    }

    fn cleanup(&mut self) -> Result<(), InvocationFailure> {
        self.state = LifecycleState::Cleaned;
        log::debug!("cleaning up file I/O test files in {}", self.tmp.display());
        let cleanup = self
            .tool
            .fileio(self.total_size, FileIoPhase::Cleanup, &self.tmp)
            .discard();
        store::remove_dir(&self.tmp)?;
        cleanup
    }
}
