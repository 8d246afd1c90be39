//! # Foundry Development Tools
//!
//! Command-line tools for development:
//! - Data validators
//! - Headless battle simulator for balance checks
//! - Replay recorder and checker

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

use thiserror::Error;

pub mod replay;
pub mod simulate;
pub mod validate;

/// Result type alias using [`ToolError`].
pub type Result<T> = std::result::Result<T, ToolError>;

/// Errors reported by the tools.
#[derive(Debug, Error)]
pub enum ToolError {
    /// Reading or writing a file failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        /// File involved.
        path: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// The game core rejected the input.
    #[error(transparent)]
    Game(#[from] foundry_core::error::GameError),

    /// A report could not be rendered as JSON.
    #[error("Failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Data loaded but failed validation.
    #[error("{} validation error(s) in '{source_name}'", errors.len())]
    Invalid {
        /// File that was checked.
        source_name: String,
        /// Every problem found.
        errors: Vec<String>,
    },
}

impl ToolError {
    /// Wrap an I/O error with the path it happened on.
    pub fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}
