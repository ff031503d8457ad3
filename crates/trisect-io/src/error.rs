//! Error types for mesh reading and writing.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while reading or writing meshes.
#[derive(Error, Debug)]
pub enum IoError {
    /// Underlying I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON region file.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed OBJ line.
    #[error("parse error at line {line}: {message}")]
    Parse {
        /// 1-indexed line number.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// Structurally invalid mesh data (bad index, non-finite coordinate).
    #[error("invalid mesh: {0}")]
    InvalidMesh(String),

    /// File extension the readers do not recognize.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(PathBuf),
}

impl IoError {
    /// Create a parse error.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
