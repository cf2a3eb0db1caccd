//! Integrity faults raised by the preparation pipeline.
//!
//! Expected input noise (short lines, annotated text) is filtered, not
//! reported here. Everything in [`PrepError`] means the corpus or the
//! configuration cannot be trusted and processing must stop.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PrepError {
    #[error("malformed alignment at line {line}: {message} ({content:?})")]
    Malformed {
        line: usize,
        content: String,
        message: String,
    },
    #[error("boundary correction failed for '{source_id}' at position {position}: {message}")]
    Boundary {
        source_id: String,
        position: usize,
        message: String,
    },
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl PrepError {
    pub(crate) fn malformed(line: usize, content: &str, message: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            content: content.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn boundary(source_id: &str, position: usize, message: impl Into<String>) -> Self {
        Self::Boundary {
            source_id: source_id.to_string(),
            position,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }
}
