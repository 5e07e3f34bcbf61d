//! Error types shared across the crate.

use thiserror::Error;

/// Errors produced by table construction, transformation and the
/// statistics-engine bridge.
#[derive(Debug, Error, PartialEq)]
pub enum TableError {
    /// A range string or counter label did not match the expected grammar.
    #[error("invalid format: {0}")]
    InvalidFormat(String),

    /// An index fell outside the valid bounds of a table axis.
    #[error("index out of range: {0}")]
    OutOfRange(String),

    /// Columns of different scalar kinds where a single kind is required.
    #[error("column type mismatch: {0}")]
    TypeMismatch(String),

    /// A column length does not agree with the table's row count.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A named array expected from the external statistics engine is absent.
    #[error("engine output missing: {0}")]
    EngineOutputMissing(String),

    /// The operation received no usable input table.
    #[error("empty input: {0}")]
    EmptyInput(String),
}

pub type Result<T> = std::result::Result<T, TableError>;
