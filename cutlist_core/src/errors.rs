//! # Error Types
//!
//! Structured error types for cutlist_core. Every failure the session can
//! hit is one of these variants: the caller decides how to surface it
//! (field highlight, toast, log line) and the session state is left as it
//! was before the failing operation.
//!
//! ## Example
//!
//! ```rust
//! use cutlist_core::errors::{CutlistError, CutlistResult};
//!
//! fn check_width(width_cm: f64) -> CutlistResult<()> {
//!     if !(30.0..=200.0).contains(&width_cm) {
//!         return Err(CutlistError::invalid_input(
//!             "width",
//!             width_cm.to_string(),
//!             "Cabinet width must be between 30 and 200 cm",
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_width(80.0).is_ok());
//! assert_eq!(check_width(12.0).unwrap_err().error_code(), "INVALID_INPUT");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for cutlist_core operations
pub type CutlistResult<T> = Result<T, CutlistError>;

/// Structured error type for calculator, session, storage and export operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CutlistError {
    /// An input value is out of range or unparseable
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// The operation needs at least one cabinet in the table
    #[error("The cutting table is empty")]
    EmptyTable,

    /// No cabinet with this id in the session
    #[error("Cabinet not found: {id}")]
    CabinetNotFound { id: String },

    /// No part at this row index
    #[error("Part not found: row {index} of {cabinet_id}")]
    PartNotFound { cabinet_id: String, index: usize },

    /// No saved project with this id
    #[error("Project not found: {id}")]
    ProjectNotFound { id: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Storage file is locked by another process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: stored version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// An export was triggered while another one is still running
    #[error("An export is already in progress")]
    ExportInProgress,

    /// Document generation failed
    #[error("Export failed: {format} - {reason}")]
    ExportFailed { format: String, reason: String },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CutlistError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CutlistError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a CabinetNotFound error
    pub fn cabinet_not_found(id: impl ToString) -> Self {
        CutlistError::CabinetNotFound { id: id.to_string() }
    }

    /// Create a PartNotFound error
    pub fn part_not_found(cabinet_id: impl ToString, index: usize) -> Self {
        CutlistError::PartNotFound {
            cabinet_id: cabinet_id.to_string(),
            index,
        }
    }

    /// Create a ProjectNotFound error
    pub fn project_not_found(id: impl ToString) -> Self {
        CutlistError::ProjectNotFound { id: id.to_string() }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CutlistError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        CutlistError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError from any displayable cause
    pub fn serialization(reason: impl ToString) -> Self {
        CutlistError::SerializationError {
            reason: reason.to_string(),
        }
    }

    /// Create an ExportFailed error
    pub fn export_failed(format: impl Into<String>, reason: impl Into<String>) -> Self {
        CutlistError::ExportFailed {
            format: format.into(),
            reason: reason.into(),
        }
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CutlistError::FileLocked { .. } | CutlistError::ExportInProgress
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CutlistError::InvalidInput { .. } => "INVALID_INPUT",
            CutlistError::EmptyTable => "EMPTY_TABLE",
            CutlistError::CabinetNotFound { .. } => "CABINET_NOT_FOUND",
            CutlistError::PartNotFound { .. } => "PART_NOT_FOUND",
            CutlistError::ProjectNotFound { .. } => "PROJECT_NOT_FOUND",
            CutlistError::FileError { .. } => "FILE_ERROR",
            CutlistError::FileLocked { .. } => "FILE_LOCKED",
            CutlistError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CutlistError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CutlistError::ExportInProgress => "EXPORT_IN_PROGRESS",
            CutlistError::ExportFailed { .. } => "EXPORT_FAILED",
            CutlistError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CutlistError::invalid_input("depth", "NaN", "Cabinet depth must be between 30 and 100 cm");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CutlistError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CutlistError::EmptyTable.error_code(), "EMPTY_TABLE");
        assert_eq!(CutlistError::project_not_found("p-1").error_code(), "PROJECT_NOT_FOUND");
        assert_eq!(CutlistError::export_failed("pdf", "boom").error_code(), "EXPORT_FAILED");
    }

    #[test]
    fn test_recoverable() {
        assert!(CutlistError::ExportInProgress.is_recoverable());
        assert!(CutlistError::file_locked("a.json", "someone", "now").is_recoverable());
        assert!(!CutlistError::EmptyTable.is_recoverable());
    }
}
