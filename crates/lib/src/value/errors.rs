//! Error types for value operations.
//!
//! This module defines structured error types for failures that can occur
//! when extracting typed data out of [`Value`](super::Value) trees, providing
//! detailed context for type mismatches during snapshot inspection.

use thiserror::Error;

/// Structured error types for value operations.
#[non_exhaustive]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValueError {
    /// Type mismatch when extracting a typed value
    #[error("value type mismatch: expected {expected}, found {actual}")]
    TypeMismatch { expected: String, actual: String },

    /// A captured snapshot root was not a keyed mapping
    #[error("snapshot root must be a map, found {actual}")]
    NonMapRoot { actual: String },
}

impl ValueError {
    /// Check if this error is related to type mismatches
    pub fn is_type_error(&self) -> bool {
        matches!(self, ValueError::TypeMismatch { .. })
    }

    /// Check if this error is related to snapshot capture
    pub fn is_capture_error(&self) -> bool {
        matches!(self, ValueError::NonMapRoot { .. })
    }
}

// Conversion from ValueError to the main Error type
impl From<ValueError> for crate::Error {
    fn from(err: ValueError) -> Self {
        crate::Error::Value(err)
    }
}
