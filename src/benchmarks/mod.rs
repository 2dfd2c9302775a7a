//! The benchmark categories a run drives.
//!
//! A category ties together everything the orchestrator needs to know about
//! one workload: its artifact file, the label its marker lines and progress
//! messages carry, and the names it answers to on the command line. The file
//! I/O category additionally owns an on-disk lifecycle, kept in [`fileio`].

use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::store::Artifact;

pub mod fileio;

/// One sysbench workload category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Prime-search CPU workload.
    Cpu,
    /// Sequential memory transfer workload.
    Memory,
    /// Lock-handoff thread scheduling workload.
    Threads,
    /// Random read/write file workload.
    FileIo,
}

impl Category {
    /// All categories in execution order.
    pub const ALL: [Self; 4] = [Self::Cpu, Self::Memory, Self::Threads, Self::FileIo];

    /// Label used in marker lines and progress messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Cpu => "CPU Test",
            Self::Memory => "Memory Test",
            Self::Threads => "Thread Test",
            Self::FileIo => "File Test",
        }
    }

    /// The artifact file this category's output accumulates in.
    #[must_use]
    pub fn artifact(self) -> Artifact {
        match self {
            Self::Cpu => Artifact::Cpu,
            Self::Memory => Artifact::Memory,
            Self::Threads => Artifact::Threads,
            Self::FileIo => Artifact::FileIo,
        }
    }

    /// Parses a category name as given on the command line.
    ///
    /// Matching is case-insensitive and the file I/O category answers to a
    /// few spellings.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL.into_iter().find(|category| {
            category
                .aliases()
                .iter()
                .any(|alias| alias.eq_ignore_ascii_case(name))
        })
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Cpu => &["cpu"],
            Self::Memory => &["memory"],
            Self::Threads => &["threads"],
            Self::FileIo => &["fileio", "file-io", "file_io", "file"],
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cpu => "cpu",
            Self::Memory => "memory",
            Self::Threads => "threads",
            Self::FileIo => "fileio",
        })
    }
}
