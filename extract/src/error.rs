//! Error types for schema extraction.
//!
//! Covers every way extraction can fail: unreadable files, source that does
//! not parse, bad input paths, and configuration files that do not load.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while extracting schemas.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Source could not be parsed into a syntax tree.
    #[error("failed to parse {}:{line}:{column}: {message}", .path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// File I/O failure.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input paths or type names were unusable.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Strict documentation mode found operations without docs.
    #[error(
        "missing documentation for {type_name}: {}; add doc comments and generate again",
        .operations.join(", ")
    )]
    MissingDocumentation {
        type_name: String,
        operations: Vec<String>,
    },

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ExtractError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, err: &syn::Error) -> Self {
        let start = err.span().start();
        Self::Parse {
            path: path.into(),
            line: start.line,
            column: start.column + 1,
            message: err.to_string(),
        }
    }
}

/// Convenience alias for results with [`ExtractError`].
pub type Result<T> = std::result::Result<T, ExtractError>;
