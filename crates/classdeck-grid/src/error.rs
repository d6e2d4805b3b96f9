//! Error types for the grid crate.

use thiserror::Error;

/// Errors raised while building a table.
///
/// Rendering itself never fails: missing fields and out-of-range pages degrade
/// to empty values instead.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// Two columns of the same table share a key.
    #[error("duplicate column key: {0}")]
    DuplicateColumn(String),

    /// A field path with no segments.
    #[error("empty field path")]
    EmptyPath,
}
