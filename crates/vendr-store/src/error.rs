//! # Storage Error Types
//!
//! Error taxonomy for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                │
//! │                                                                     │
//! │  Backend failure (lock, I/O, ...)                                   │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  StoreError (this module) ← adds entity/id context                  │
//! │       │                                                             │
//! │       ▼                                                             │
//! │  EngineError (vendr-engine) ← the caller-facing taxonomy            │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Storage operation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// Entity not found.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A decrement would take a product's stock below zero. Checked and
    /// reported atomically with the mutation, never from a stale read.
    #[error("insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// A precondition on the record's state failed (e.g. quote no longer
    /// open). The conflicting state is reported so the caller can map it.
    #[error("{entity} {id} is in state '{state}'")]
    StateConflict {
        entity: &'static str,
        id: String,
        state: String,
    },

    /// Transient backend failure. Safe to retry with backoff; the store
    /// itself never retries.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and id.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            id: id.into(),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::InsufficientStock {
            product_id: "p1".into(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "insufficient stock for product p1: available 3, requested 5"
        );

        assert_eq!(
            StoreError::not_found("Quote", "q9").to_string(),
            "Quote not found: q9"
        );
    }
}
