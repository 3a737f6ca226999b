use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by [`TextBuffer`](super::TextBuffer) load, save and validation.
///
/// Out-of-range positions are not errors: mutation and navigation calls
/// reject them silently and report `false`.
#[derive(Debug, Error)]
pub enum BufferError {
    /// A line or codepoint node could not be allocated.
    #[error("node limit reached ({limit} nodes)")]
    Allocation { limit: usize },

    /// The file could neither be opened nor created.
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading failed after the file was opened.
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Writing failed after the destination was opened.
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// `save` was called on a buffer that was never associated with a file.
    #[error("buffer has no file name")]
    NoPath,

    /// The linked structure no longer satisfies its invariants.
    #[error("buffer integrity violated: {0}")]
    Integrity(String),
}
