//! # Error Types
//!
//! Structured error types for takeoff_core. These cover operational failures
//! around a calculation: settings that cannot drive a takeoff, project file
//! I/O, report rendering and export refusal.
//!
//! Problems with the *items* being estimated are not errors in this sense.
//! They are collected as data by the [`validation`](crate::validation) module
//! and returned inside a [`CalculationResult`](crate::estimate::CalculationResult).
//!
//! ## Example
//!
//! ```rust
//! use takeoff_core::errors::{CalcError, CalcResult};
//!
//! fn validate_coverage(coverage_m2: f64) -> CalcResult<()> {
//!     if coverage_m2 <= 0.0 {
//!         return Err(CalcError::invalid_input(
//!             "panel_coverage_m2",
//!             coverage_m2.to_string(),
//!             "Coverage must be positive",
//!         ));
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for takeoff_core operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Structured error type for takeoff operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum CalcError {
    /// An input value is invalid (out of range, wrong type, etc.)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// Material name not present in the catalog
    #[error("Material not found: {material_name}")]
    MaterialNotFound { material_name: String },

    /// An export was requested without a complete calculation to export
    #[error("Export refused ({format}): {reason}")]
    ExportRefused { format: String, reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl CalcError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MaterialNotFound error
    pub fn material_not_found(material_name: impl Into<String>) -> Self {
        CalcError::MaterialNotFound {
            material_name: material_name.into(),
        }
    }

    /// Create an ExportRefused error
    pub fn export_refused(format: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::ExportRefused {
            format: format.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        CalcError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Check if the user can fix this by recalculating with corrected input
    pub fn is_user_correctable(&self) -> bool {
        matches!(
            self,
            CalcError::InvalidInput { .. } | CalcError::ExportRefused { .. }
        )
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            CalcError::InvalidInput { .. } => "INVALID_INPUT",
            CalcError::MaterialNotFound { .. } => "MATERIAL_NOT_FOUND",
            CalcError::ExportRefused { .. } => "EXPORT_REFUSED",
            CalcError::FileError { .. } => "FILE_ERROR",
            CalcError::SerializationError { .. } => "SERIALIZATION_ERROR",
            CalcError::VersionMismatch { .. } => "VERSION_MISMATCH",
            CalcError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

impl From<serde_json::Error> for CalcError {
    fn from(e: serde_json::Error) -> Self {
        CalcError::SerializationError {
            reason: e.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = CalcError::invalid_input("post_spacing_m", "-0.4", "Spacing must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: CalcError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(CalcError::material_not_found("Panel:Glass").error_code(), "MATERIAL_NOT_FOUND");
        assert_eq!(CalcError::export_refused("pdf", "empty").error_code(), "EXPORT_REFUSED");
    }

    #[test]
    fn test_user_correctable() {
        assert!(CalcError::export_refused("csv", "no totals").is_user_correctable());
        assert!(!CalcError::file_error("read", "a.json", "denied").is_user_correctable());
    }

    #[test]
    fn test_display_message() {
        let error = CalcError::export_refused("pdf", "Run a valid calculation before exporting.");
        assert_eq!(
            error.to_string(),
            "Export refused (pdf): Run a valid calculation before exporting."
        );
    }
}
