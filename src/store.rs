//! Management of the run root: the directory tree one benchmark run writes
//! its artifacts into.
//!
//! The run root is destroyed and recreated exactly once per run, before any
//! benchmark executes, so every run starts from a clean tree. The file names
//! inside the root are fixed; [`Artifact`] enumerates them in creation order,
//! which is also the order they are replayed in at the end of a run.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::StorageError;

/// One of the fixed artifact files of a benchmark run, in creation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// Static host description, written once per run.
    MachineSpecs,
    /// Full installed-package inventory.
    LocalModules,
    /// Environment-local installed-package inventory.
    VirtualenvModules,
    /// Raw tool output of the CPU category.
    Cpu,
    /// Raw tool output of the memory category.
    Memory,
    /// Raw tool output of the thread category.
    Threads,
    /// Raw tool output of the file I/O category.
    FileIo,
}

impl Artifact {
    /// All artifacts in creation (and replay) order.
    pub const ALL: [Self; 7] = [
        Self::MachineSpecs,
        Self::LocalModules,
        Self::VirtualenvModules,
        Self::Cpu,
        Self::Memory,
        Self::Threads,
        Self::FileIo,
    ];

    /// File name of this artifact under the run root.
    #[must_use]
    pub fn file_name(self) -> &'static str {
        match self {
            Self::MachineSpecs => "machine-specs.txt",
            Self::LocalModules => "python-local-modules.txt",
            Self::VirtualenvModules => "python-virtualenv-modules.txt",
            Self::Cpu => "machine-sysbench-cpu.txt",
            Self::Memory => "machine-sysbench-memory.txt",
            Self::Threads => "machine-sysbench-threads.txt",
            Self::FileIo => "machine-sysbench-file.txt",
        }
    }
}

/// Resolved layout of a run root.
///
/// Holds nothing but the root path; all artifact and working-directory paths
/// are derived from it so there is exactly one place that knows the layout.
#[derive(Clone, Debug)]
pub struct RunRoot {
    root: PathBuf,
}

impl RunRoot {
    /// Wraps a root path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory itself.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Full path of an artifact file under this root.
    #[must_use]
    pub fn artifact(&self, artifact: Artifact) -> PathBuf {
        self.root.join(artifact.file_name())
    }

    /// The temporary working subdirectory used only by the file I/O category.
    #[must_use]
    pub fn tmp(&self) -> PathBuf {
        self.root.join("tmp")
    }
}

/// Recursively deletes `root` if it exists, then creates it fresh.
///
/// Idempotent: calling it twice leaves the same empty directory as calling it
/// once, and a missing `root` is not an error.
///
/// # Errors
///
/// Returns a [`StorageError`] if deletion or creation fails (permissions,
/// read-only filesystem, ...).
pub fn reset(root: &Path) -> Result<(), StorageError> {
    remove_dir(root)?;
    ensure_dir(root)
}

/// Creates `path` and any missing parents; no-op if it already exists.
///
/// # Errors
///
/// Returns a [`StorageError`] if creation fails.
pub fn ensure_dir(path: &Path) -> Result<(), StorageError> {
    fs::create_dir_all(path).map_err(|source| StorageError::Create {
        path: path.to_path_buf(),
        source,
    })
}

/// Recursively deletes `path` if it is a directory; no-op otherwise.
///
/// Missing paths and plain files are left alone, so this is safe to call
/// without checking first.
///
/// # Errors
///
/// Returns a [`StorageError`] if the directory exists but cannot be removed.
pub fn remove_dir(path: &Path) -> Result<(), StorageError> {
    if !path.is_dir() {
        return Ok(());
    }
    fs::remove_dir_all(path).map_err(|source| StorageError::Remove {
        path: path.to_path_buf(),
        source,
    })
}
