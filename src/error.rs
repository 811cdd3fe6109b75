//! Error type shared across the crate.

use std::io;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, TsoError>;

#[derive(Debug, Error)]
pub enum TsoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input ended inside the named field.
    #[error("input truncated while reading {0}")]
    TruncatedInput(&'static str),

    #[error("unsupported {format} version {found}, expected {expected}")]
    UnsupportedVersion {
        format: &'static str,
        expected: u32,
        found: u32,
    },

    /// Bytes were left over after a complete decode.
    #[error("{remaining} trailing bytes after {format} data")]
    TrailingData {
        format: &'static str,
        remaining: usize,
    },

    #[error("string not representable in Windows-1252: {0}")]
    Encoding(String),

    /// A mesh or animation references a bone the skeleton does not have.
    #[error("binding mismatch: {0}")]
    BindingMismatch(String),

    #[error("vertex {vertex} has {group_count} bone influences, expected 1 or 2")]
    DegenerateSkinning { vertex: usize, group_count: usize },

    /// Structurally invalid in-memory data that cannot be encoded or bound.
    #[error("invalid data: {0}")]
    InvalidData(String),
}
