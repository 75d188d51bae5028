//! # Domain Types
//!
//! Core domain types used throughout Vendr POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐   ┌───────────────┐          │
//! │  │    Product    │   │    Service    │   │   Customer    │          │
//! │  │  ───────────  │   │  ───────────  │   │  ───────────  │          │
//! │  │  id, ownerId  │   │  id, ownerId  │   │  id, ownerId  │          │
//! │  │  sku, barcode │   │  name, price  │   │  name, email  │          │
//! │  │  price, stock │   │  (no stock)   │   └───────────────┘          │
//! │  └───────────────┘   └───────────────┘                              │
//! │                                                                     │
//! │  ┌───────────────┐   ┌───────────────┐                              │
//! │  │     Quote     │──▶│     Sale      │   Quote converts exactly     │
//! │  │  items: kind  │   │  product      │   once; service lines are    │
//! │  │  product OR   │   │  lines only   │   dropped from the sale's    │
//! │  │  service      │   │  + receipt    │   item list but still        │
//! │  │  status: open │   │  snapshot     │   contribute to the total.   │
//! │  └───────────────┘   └───────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Ownership
//! Every record carries an `owner_id`. An admin caller may view/act across
//! all owners; non-admin callers are scoped to their own `owner_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::Money;
use crate::plan::PlanId;

/// Generates a fresh entity id (UUID v4, string form).
pub fn new_entity_id() -> String {
    Uuid::new_v4().to_string()
}

// =============================================================================
// Caller
// =============================================================================

/// The authenticated identity a request acts as.
///
/// Token issuance/verification is outside this workspace; by the time a
/// caller reaches the services it has already been resolved to an id, an
/// admin flag, and a plan tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Caller {
    /// Owner id all non-admin operations are scoped to.
    pub id: String,
    /// Admin callers see and act across all owners.
    pub admin: bool,
    /// The caller's subscription tier, consulted for catalog/customer limits.
    pub plan: PlanId,
}

impl Caller {
    /// A regular (non-admin) caller on the given plan.
    pub fn user(id: impl Into<String>, plan: PlanId) -> Self {
        Caller {
            id: id.into(),
            admin: false,
            plan,
        }
    }

    /// An admin caller. Admins run on the top tier.
    pub fn admin(id: impl Into<String>) -> Self {
        Caller {
            id: id.into(),
            admin: true,
            plan: PlanId::Elite,
        }
    }

    /// Whether this caller may see/mutate a record owned by `owner_id`.
    pub fn can_access(&self, owner_id: &str) -> bool {
        self.admin || self.id == owner_id
    }
}

// =============================================================================
// Product
// =============================================================================

/// A stock-tracked catalog item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Owner this product belongs to.
    pub owner_id: String,

    /// Display name shown on quotes, sales and receipts.
    pub name: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Barcode (EAN-13, UPC-A, etc.).
    pub barcode: Option<String>,

    /// Unit price (non-negative decimal).
    pub price: Money,

    /// Current stock level. Never goes below zero.
    pub stock: i64,
}

// =============================================================================
// Service
// =============================================================================

/// A catalog item with no stock, always available for quoting.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub price: Money,
}

// =============================================================================
// Customer
// =============================================================================

/// A customer record, owner-scoped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub email: Option<String>,
}

// =============================================================================
// Line Items
// =============================================================================

/// Discriminates what a quote line points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineItemKind {
    Product,
    Service,
}

/// One entry in a quote. Embedded, never independently persisted.
///
/// `price` is an explicit override captured at entry time; when present it
/// takes precedence over the current catalog price, both at quote creation
/// and again at conversion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub kind: LineItemKind,
    /// Points to Product.id or Service.id depending on `kind`.
    pub ref_id: String,
    /// Positive quantity.
    pub qty: u32,
    /// Optional unit-price override (snapshot at time of entry).
    pub price: Option<Money>,
}

// =============================================================================
// Quote
// =============================================================================

/// The lifecycle of a quote. `Converted` is terminal; there is no path
/// back and no further transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Open,
    Converted,
}

/// A non-binding estimate. Creation takes no stock and has no catalog side
/// effects; stock is only checked and decremented at conversion.
///
/// Invariant: `total` equals the sum of per-line rounded subtotals at
/// creation time and is never recomputed afterwards, even if catalog prices
/// change. The sale produced by conversion carries its own recomputed total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    pub owner_id: String,
    pub customer_id: Option<String>,
    /// Ordered line items, product and service kinds mixed freely.
    pub items: Vec<LineItem>,
    /// Derived at creation, persisted, frozen.
    pub total: Money,
    pub status: QuoteStatus,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sale
// =============================================================================

/// One product line of a sale. Service lines from a converted quote are
/// dropped here (sales only record product lines) but their value is part
/// of the sale total.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleItem {
    pub product_id: String,
    pub qty: u32,
    /// Effective unit price actually charged (override or catalog price at
    /// the instant of sale).
    pub price: Money,
}

/// A committed transaction. Created directly or by converting a quote.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: String,
    /// The converting caller's id. For an admin converting on behalf of
    /// another owner this is the admin, not the quote's original owner.
    pub owner_id: String,
    pub customer_id: Option<String>,
    pub items: Vec<SaleItem>,
    pub total: Money,
    pub created_at: DateTime<Utc>,
    /// The original quote total when this sale came from a conversion.
    /// Catalog prices may have moved between quoting and converting; both
    /// figures are kept so the divergence is observable, not silent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quoted_total: Option<Money>,
    /// Audit/printing snapshot captured at creation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub receipt: Option<Receipt>,
}

// =============================================================================
// Receipt
// =============================================================================

/// One printable receipt line. Unlike `SaleItem`, service lines appear here
/// too; the receipt reflects everything the customer was charged for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptLine {
    /// Catalog name at the instant of sale (frozen).
    pub description: String,
    pub qty: u32,
    pub unit_price: Money,
    pub subtotal: Money,
}

/// Snapshot of a sale for audit and printing, frozen at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Calendar date (UTC) the sale was committed.
    pub date: String,
    /// Wall-clock time (UTC) the sale was committed.
    pub time: String,
    pub lines: Vec<ReceiptLine>,
    pub total: Money,
}

impl Receipt {
    /// Builds a receipt for an instant, formatting the UTC date and time
    /// into the printable header fields.
    pub fn at(instant: DateTime<Utc>, lines: Vec<ReceiptLine>, total: Money) -> Self {
        Receipt {
            date: instant.format("%Y-%m-%d").to_string(),
            time: instant.format("%H:%M:%S").to_string(),
            lines,
            total,
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
