//! Error types for parsing and configuration
//!
//! The engine operations themselves are total; errors only arise at the edges
//! where text or files are turned into engine values.

use thiserror::Error;

/// Text that does not name one of the four directions
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown direction: {0:?}")]
pub struct ParseDirectionError(pub String);

/// Errors building a board from rows or text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("invalid tile {value} at row {row}, column {col} (expected 0 or a power of two from 2 to 131072)")]
    InvalidTile { row: usize, col: usize, value: u32 },

    #[error("expected 4 rows, found {found}")]
    WrongRowCount { found: usize },

    #[error("row {row}: expected 4 cells, found {found}")]
    WrongColumnCount { row: usize, found: usize },

    #[error("invalid cell value: {0:?}")]
    InvalidNumber(String),
}

/// Errors loading or saving a config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}
