//! # Error Types
//!
//! Domain-specific error types for vendr-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  vendr-core errors (this file)                                      │
//! │  └── ValidationError  - Input shape/range failures                  │
//! │                                                                     │
//! │  vendr-store errors (separate crate)                                │
//! │  └── StoreError       - Persistence failures                        │
//! │                                                                     │
//! │  vendr-engine errors (separate crate)                               │
//! │  └── EngineError      - The caller-facing taxonomy                  │
//! │                                                                     │
//! │  Flow: ValidationError ─┐                                           │
//! │        StoreError      ─┴─► EngineError ─► caller                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field, id, quantity)
//! 3. Errors are enum variants, never String

use thiserror::Error;

/// Input validation errors.
///
/// These occur when a request doesn't meet shape or range requirements.
/// Raised before any business logic runs: reject early instead of letting
/// malformed values flow through arithmetic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustBeNonNegative { field: String },

    /// A collection that must not be empty is empty.
    #[error("{field} must not be empty")]
    Empty { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },
}

impl ValidationError {
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

/// Convenience type alias for validation results.
pub type ValidationResult<T> = Result<T, ValidationError>;
