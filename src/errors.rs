//! Error types for the snipstash application.
//!
//! This module defines custom error types that categorize different failures
//! that can occur during snippet library operations.

use std::io;

use thiserror::Error;

/// The main error type for the snipstash application.
#[derive(Error, Debug)]
pub enum SnipError {
    /// Errors related to file I/O operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Errors related to serialization/deserialization operations.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A required snippet field was missing or blank.
    #[error("Snippet {field} is required")]
    Validation { field: &'static str },

    /// Snippet was not found when performing an operation.
    #[error("Snippet not found: {id}")]
    NotFound { id: String },

    /// Writing the library to durable storage failed. The in-memory state
    /// may have diverged from the slot file; reload before further writes.
    #[error("Failed to persist snippet library: {message}")]
    Persistence { message: String },

    /// The import payload was malformed or contained an invalid record.
    /// Nothing is imported when this is raised.
    #[error("Import failed: {message}")]
    Import { message: String },

    /// Generic application error with a custom message.
    #[error("{message}")]
    Application { message: String },

    /// file not found
    #[error("File not found: {file_path}")]
    FileNotFound { file_path: String },

    #[error("{message}")]
    Editor { message: String },
}
