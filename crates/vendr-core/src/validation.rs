//! # Validation Module
//!
//! Input validation for catalog, customer and line-item requests.
//!
//! ## Strategy
//! The wire layer (excluded from this workspace) deserializes into the
//! typed request structs; this module then enforces the business-shape
//! rules the type system can't: non-empty names, non-negative prices,
//! positive quantities, non-empty item batches. Every check runs before
//! any store access.

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;

/// Maximum length for names shown on receipts.
pub const MAX_NAME_LEN: usize = 200;

/// Validates a display name (product, service, customer).
pub fn validate_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("name"));
    }

    if name.len() > MAX_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_NAME_LEN,
        });
    }

    Ok(())
}

/// Validates a catalog price. Zero is allowed (free items); negative never.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates an initial stock level.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::MustBeNonNegative {
            field: "stock".to_string(),
        });
    }

    Ok(())
}

/// Validates a line quantity. Quantities are `u32` so negatives are
/// unrepresentable; zero is still rejected here.
pub fn validate_qty(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "qty".to_string(),
        });
    }

    Ok(())
}

/// Validates a reference id (product/service/customer pointer).
pub fn validate_ref_id(ref_id: &str) -> ValidationResult<()> {
    if ref_id.trim().is_empty() {
        return Err(ValidationError::required("refId"));
    }

    Ok(())
}

/// Validates that an item batch is non-empty. Empty batches fail before
/// any per-item check runs.
pub fn validate_items_non_empty<T>(items: &[T]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    Ok(())
}
