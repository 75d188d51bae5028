//! # Store Trait
//!
//! The single storage abstraction the engine and services work against.
//!
//! ## Why One Trait?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                   Storage Abstraction                               │
//! │                                                                     │
//! │   engine / catalog / metrics                                        │
//! │            │                                                        │
//! │            ▼                                                        │
//! │     Arc<dyn Store>  ← injected, explicitly-lifetimed handle         │
//! │            │                                                        │
//! │      ┌─────┴──────┐                                                 │
//! │      ▼            ▼                                                 │
//! │  MemoryStore   (any future backend: SQL, document, ...)             │
//! │                                                                     │
//! │  One code path for all backends. No dual document/relational        │
//! │  branching inside business logic.                                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Atomicity Contract
//! Two operations carry more than plain CRUD semantics and every backend
//! must honor them:
//!
//! - [`Store::decrement_stock_batch`] validates every line against
//!   current stock and applies every decrement as one unit. If any line
//!   would go negative, nothing is applied. Concurrent batches touching
//!   the same product must serialize; two batches both passing a check
//!   against the same stale stock value is a correctness bug.
//! - [`Store::mark_quote_converted`] does a compare-and-set from `open` to
//!   `converted`; fails with a state conflict if the quote is no longer
//!   open. Conversion is exactly-once.

use async_trait::async_trait;

use vendr_core::{Customer, Product, Quote, Sale, Service};

use crate::error::StoreResult;

/// One line of an atomic stock decrement batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockDecrement {
    pub product_id: String,
    pub qty: u32,
}

/// CRUD plus the two atomic operations, for every backing store.
///
/// Listing methods take `owner: Option<&str>`: `None` returns all records
/// (admin view), `Some(id)` filters to that owner. Reads may observe stale
/// data under concurrency; the stock check never relies on a read.
#[async_trait]
pub trait Store: Send + Sync {
    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    async fn insert_product(&self, product: Product) -> StoreResult<()>;

    async fn get_product(&self, id: &str) -> StoreResult<Option<Product>>;

    /// Replaces the stored record (last-write-wins).
    async fn update_product(&self, product: Product) -> StoreResult<()>;

    /// Removes and returns the record.
    async fn delete_product(&self, id: &str) -> StoreResult<Product>;

    async fn list_products(&self, owner: Option<&str>) -> StoreResult<Vec<Product>>;

    /// Adjusts stock by `delta` (negative for sales, positive for
    /// restocking). Fails without mutating if the result would go below
    /// zero; check and mutation are one atomic step. Returns the new level.
    async fn adjust_stock(&self, id: &str, delta: i64) -> StoreResult<i64>;

    /// Applies all decrements as one unit of work, or none of them.
    async fn decrement_stock_batch(&self, lines: &[StockDecrement]) -> StoreResult<()>;

    // -------------------------------------------------------------------------
    // Services
    // -------------------------------------------------------------------------

    async fn insert_service(&self, service: Service) -> StoreResult<()>;

    async fn get_service(&self, id: &str) -> StoreResult<Option<Service>>;

    async fn update_service(&self, service: Service) -> StoreResult<()>;

    async fn delete_service(&self, id: &str) -> StoreResult<Service>;

    async fn list_services(&self, owner: Option<&str>) -> StoreResult<Vec<Service>>;

    // -------------------------------------------------------------------------
    // Customers
    // -------------------------------------------------------------------------

    async fn insert_customer(&self, customer: Customer) -> StoreResult<()>;

    async fn list_customers(&self, owner: Option<&str>) -> StoreResult<Vec<Customer>>;

    // -------------------------------------------------------------------------
    // Quotes
    // -------------------------------------------------------------------------

    async fn insert_quote(&self, quote: Quote) -> StoreResult<()>;

    async fn get_quote(&self, id: &str) -> StoreResult<Option<Quote>>;

    async fn list_quotes(&self, owner: Option<&str>) -> StoreResult<Vec<Quote>>;

    /// Compare-and-set `open` → `converted`. State conflict if already
    /// converted; not found if the quote never existed.
    async fn mark_quote_converted(&self, id: &str) -> StoreResult<()>;

    // -------------------------------------------------------------------------
    // Sales
    // -------------------------------------------------------------------------

    async fn insert_sale(&self, sale: Sale) -> StoreResult<()>;

    async fn list_sales(&self, owner: Option<&str>) -> StoreResult<Vec<Sale>>;
}
