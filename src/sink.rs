//! Append-oriented text output.
//!
//! Artifact files accumulate interleaved marker lines and raw tool output
//! across the repetitions of a run, so every write path here appends; the
//! single exception is [`write`], used for artifacts that are produced whole
//! exactly once. [`replay`] reads an artifact back and echoes it to stdout.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write as _},
    path::Path,
};

/// Appends `text` to the file at `path`, creating it if missing.
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be opened or written.
pub fn append(path: &Path, text: &str) -> io::Result<()> {
    append_target(path)?.write_all(text.as_bytes())
}

/// Opens the file at `path` for appending, creating it if missing.
///
/// The handle is handed to child processes so their stdout lands directly in
/// the artifact without passing through this process.
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be opened.
pub fn append_target(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Replaces the contents of the file at `path` with `text`.
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be written.
pub fn write(path: &Path, text: &str) -> io::Result<()> {
    fs::write(path, text)
}

/// Prints the contents of the file at `path` to stdout.
///
/// Invalid UTF-8 is replaced rather than rejected; benchmark tools own their
/// output encoding and a replacement character beats losing the artifact.
///
/// # Errors
///
/// Returns the underlying I/O error if the file cannot be read, in particular
/// [`io::ErrorKind::NotFound`] when it was never produced.
pub fn replay(path: &Path) -> io::Result<()> {
    let bytes = fs::read(path)?;
    println!("{}", String::from_utf8_lossy(&bytes));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifact.txt");

        append(&path, "first\n").unwrap();
        append(&path, "second\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn write_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifact.txt");

        write(&path, "old contents\n").unwrap();
        write(&path, "new\n").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
    }

    #[test]
    fn replay_reports_missing_files() {
        let dir = tempfile::tempdir().unwrap();
        let err = replay(&dir.path().join("never-written.txt")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn replay_reads_existing_files() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artifact.txt");
        append(&path, "line\n").unwrap();

        replay(&path).unwrap();
    }
}
