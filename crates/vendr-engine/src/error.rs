//! # Engine Error Types
//!
//! The caller-facing error taxonomy. Every condition is distinct and
//! recoverable: none are fatal to the process, and no operation ever
//! downgrades a failure into a fabricated success.
//!
//! ## Taxonomy → transport mapping (for the excluded API layer)
//! ```text
//! InvalidRequest     → 400  caller error, not retried
//! InvalidReference   → 400  dangling id
//! Forbidden          → 403  caller may not touch the record
//! NotFound           → 404  missing quote/sale/product id
//! InsufficientStock  → 409  retry with adjusted qty
//! AlreadyConverted   → 409  terminal state, not retried
//! LimitExceeded      → 403  plan cap reached
//! Unavailable        → 503  transient store failure, retry with backoff
//! ```
//!
//! The engine performs no retries internally; retry policy belongs to the
//! caller.

use thiserror::Error;

use vendr_core::ValidationError;
use vendr_store::StoreError;

/// Errors surfaced by the engine and its services.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed input: empty item list, zero quantity, negative price,
    /// missing required field.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] ValidationError),

    /// A line item points at a product/service id that doesn't resolve.
    #[error("invalid {kind} reference: {id}")]
    InvalidReference { kind: &'static str, id: String },

    /// A decrement would take stock below zero.
    #[error("insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        available: i64,
        requested: i64,
    },

    /// The quote was already converted. Conversion is exactly-once;
    /// repeated convert calls fail rather than silently re-applying.
    #[error("quote {quote_id} already converted")]
    AlreadyConverted { quote_id: String },

    /// Missing entity by id.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The caller's plan cap for this resource is reached.
    #[error("plan limit reached for {resource} ({limit})")]
    LimitExceeded { resource: &'static str, limit: u32 },

    /// Non-admin caller touching a record owned by someone else.
    #[error("forbidden")]
    Forbidden,

    /// Transient store failure; safe to retry with backoff.
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl EngineError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        EngineError::NotFound {
            entity,
            id: id.into(),
        }
    }

    pub fn invalid_reference(kind: &'static str, id: impl Into<String>) -> Self {
        EngineError::InvalidReference {
            kind,
            id: id.into(),
        }
    }
}

/// Store failures keep their meaning on the way up: a stock conflict stays
/// a stock conflict, a quote state conflict becomes `AlreadyConverted`.
impl From<StoreError> for EngineError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => EngineError::NotFound { entity, id },
            StoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => EngineError::InsufficientStock {
                product_id,
                available,
                requested,
            },
            StoreError::StateConflict { id, .. } => EngineError::AlreadyConverted { quote_id: id },
            StoreError::Unavailable(msg) => EngineError::Unavailable(msg),
        }
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
