//! Error types for deck-core

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in deck-core
#[derive(Debug, Error)]
pub enum Error {
    /// File or URL conversion requested for a game without a specialized converter
    #[error("{operation} conversion is not supported for game '{game}'")]
    UnsupportedOperation { operation: &'static str, game: String },

    /// Converter registry misconfiguration (e.g. two converters claiming one game)
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Input text was supplied for a section the deck does not have
    #[error("unknown deck section '{0}'")]
    UnknownSection(String),

    /// File extension not handled by the selected converter
    #[error("unsupported deck file format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to fetch a remote deck page
    #[error("failed to fetch '{url}': {message}")]
    Fetch { url: String, message: String },

    /// CSV parsing error from the csv crate
    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// CSV deck list without the columns we need
    #[error("failed to parse CSV '{path}': {message}")]
    CsvLayout { path: PathBuf, message: String },

    /// Directory traversal error
    #[error("failed to traverse directory: {0}")]
    WalkDir(#[from] walkdir::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
