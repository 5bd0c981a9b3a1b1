//! Error types for the bookstore crate
//!
//! Provides structured error types with context for better debugging
//! and user-friendly error messages.

use crate::config::Mode;
use std::path::PathBuf;
use thiserror::Error;

/// Printed after any failed online run
pub const OFFLINE_HINT: &str =
    "If you cannot reach MongoDB from this machine, re-run with NO_DB=1 (or --offline) to use offline mode";

/// The main error type for bookstore operations
#[derive(Debug, Error)]
pub enum Error {
    // ==========================================================================
    // Store Errors
    // ==========================================================================
    #[error("Failed to connect to '{uri}': {source}")]
    Connect {
        uri: String,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("Store operation '{operation}' failed: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: mongodb::error::Error,
    },

    #[error("Failed to decode {shape} returned by the store: {message}")]
    Decode { shape: &'static str, message: String },

    // ==========================================================================
    // Dataset Errors
    // ==========================================================================
    #[error("Failed to read dataset '{path}': {source}")]
    DatasetRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse dataset '{path}': {message}")]
    DatasetParse { path: PathBuf, message: String },

    #[error("Unsupported dataset format '{path}' (expected .json, .yaml or .yml)")]
    UnsupportedDataset { path: PathBuf },

    #[error("Record {index} is missing required field '{field}'")]
    MissingField { index: usize, field: &'static str },

    #[error("Record {index} has an invalid '{field}': expected {expected}")]
    InvalidField {
        index: usize,
        field: &'static str,
        expected: &'static str,
    },

    // ==========================================================================
    // Argument Errors
    // ==========================================================================
    #[error("Invalid {kind} '{value}': {reason}")]
    InvalidArgument {
        kind: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Result type alias for bookstore operations
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// Conversions from external error types
// =============================================================================

impl From<crate::validation::ValidationError> for Error {
    fn from(err: crate::validation::ValidationError) -> Self {
        use crate::validation::ValidationError;

        match err {
            ValidationError::Empty(kind) => Error::InvalidArgument {
                kind,
                value: String::new(),
                reason: "cannot be empty",
            },
            ValidationError::TooLong(kind, value, _max) => Error::InvalidArgument {
                kind,
                value,
                reason: "exceeds maximum length",
            },
            ValidationError::InvalidName(kind, value, reason) => Error::InvalidArgument {
                kind,
                value,
                reason,
            },
            ValidationError::OutOfRange(kind, value, reason) => Error::InvalidArgument {
                kind,
                value,
                reason,
            },
        }
    }
}

impl Error {
    /// Wraps a driver error with the name of the operation that raised it
    pub(crate) fn store(operation: &'static str) -> impl FnOnce(mongodb::error::Error) -> Self {
        move |source| {
            tracing::error!(operation, error = %source, "store operation failed");
            Error::Store { operation, source }
        }
    }

    /// Returns a user-friendly suggestion for fixing the error
    pub fn suggestion(&self) -> Option<&'static str> {
        if self.is_store_fault() {
            return Some(OFFLINE_HINT);
        }
        match self {
            Error::DatasetRead { .. } => Some("Point --data (or BOOKSTORE_DATA) at an existing books file"),
            Error::MissingField { .. } | Error::InvalidField { .. } => Some(
                "Every record needs title, author, genre, published_year, price and in_stock",
            ),
            Error::UnsupportedDataset { .. } => Some("Rename the dataset with a .json, .yaml or .yml extension"),
            _ => None,
        }
    }

    /// Returns true if the error came from the live store
    pub fn is_store_fault(&self) -> bool {
        matches!(self, Error::Connect { .. } | Error::Store { .. } | Error::Decode { .. })
    }
}

/// Hints to print after a run in `mode` failed with `err`
///
/// `err` is `None` when the failure did not originate in this crate. Online
/// failures always end with the offline hint.
pub fn failure_hints(err: Option<&Error>, mode: Mode) -> Vec<&'static str> {
    let mut hints: Vec<&'static str> = err.and_then(Error::suggestion).into_iter().collect();
    if mode == Mode::Online && !hints.contains(&OFFLINE_HINT) {
        hints.push(OFFLINE_HINT);
    }
    hints
}
