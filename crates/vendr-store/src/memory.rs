//! # In-Memory Store
//!
//! The reference `Store` backend: a single `RwLock` over plain vectors.
//!
//! ## Concurrency Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    MemoryStore Locking                              │
//! │                                                                     │
//! │  Reads (list/get)        ──► read lock, many at once, may be stale  │
//! │  Writes (insert/update)  ──► write lock, exclusive                  │
//! │  decrement_stock_batch   ──► ONE write lock section:                │
//! │                              check all lines, then apply all lines  │
//! │                                                                     │
//! │  The write lock is what makes check-then-decrement atomic: no       │
//! │  other batch can validate against the stock this batch is about     │
//! │  to change.                                                         │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Vectors (not maps) keep insertion order, which is the listing order the
//! durable contract exposes.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use vendr_core::{Customer, Product, Quote, QuoteStatus, Sale, Service};

use crate::error::{StoreError, StoreResult};
use crate::store::{StockDecrement, Store};

#[derive(Debug, Default)]
struct StoreData {
    products: Vec<Product>,
    services: Vec<Service>,
    customers: Vec<Customer>,
    quotes: Vec<Quote>,
    sales: Vec<Sale>,
}

/// In-memory `Store` backend. Cheap to construct, used directly in tests
/// and as the single-process runtime store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<StoreData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            data: RwLock::new(StoreData::default()),
        }
    }
}

fn filter_owned<T: Clone>(records: &[T], owner: Option<&str>, owner_of: impl Fn(&T) -> &str) -> Vec<T> {
    match owner {
        None => records.to_vec(),
        Some(owner) => records
            .iter()
            .filter(|r| owner_of(r) == owner)
            .cloned()
            .collect(),
    }
}

#[async_trait]
impl Store for MemoryStore {
    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    async fn insert_product(&self, product: Product) -> StoreResult<()> {
        debug!(id = %product.id, sku = %product.sku, "inserting product");
        self.data.write().await.products.push(product);
        Ok(())
    }

    async fn get_product(&self, id: &str) -> StoreResult<Option<Product>> {
        let data = self.data.read().await;
        Ok(data.products.iter().find(|p| p.id == id).cloned())
    }

    async fn update_product(&self, product: Product) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let slot = data
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or_else(|| StoreError::not_found("Product", &product.id))?;
        *slot = product;
        Ok(())
    }

    async fn delete_product(&self, id: &str) -> StoreResult<Product> {
        let mut data = self.data.write().await;
        let idx = data
            .products
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("Product", id))?;
        Ok(data.products.remove(idx))
    }

    async fn list_products(&self, owner: Option<&str>) -> StoreResult<Vec<Product>> {
        let data = self.data.read().await;
        Ok(filter_owned(&data.products, owner, |p| &p.owner_id))
    }

    async fn adjust_stock(&self, id: &str, delta: i64) -> StoreResult<i64> {
        let mut data = self.data.write().await;
        let product = data
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("Product", id))?;

        let next = product.stock + delta;
        if next < 0 {
            return Err(StoreError::InsufficientStock {
                product_id: id.to_string(),
                available: product.stock,
                requested: -delta,
            });
        }

        product.stock = next;
        debug!(id = %id, delta, stock = next, "stock adjusted");
        Ok(next)
    }

    async fn decrement_stock_batch(&self, lines: &[StockDecrement]) -> StoreResult<()> {
        let mut data = self.data.write().await;

        // Aggregate per product so two lines for the same product cannot
        // each pass against the same starting stock.
        let mut required: HashMap<&str, i64> = HashMap::new();
        for line in lines {
            *required.entry(line.product_id.as_str()).or_insert(0) += i64::from(line.qty);
        }

        // Check everything before touching anything.
        for (product_id, qty) in &required {
            let product = data
                .products
                .iter()
                .find(|p| p.id == *product_id)
                .ok_or_else(|| StoreError::not_found("Product", *product_id))?;
            if product.stock < *qty {
                return Err(StoreError::InsufficientStock {
                    product_id: product.id.clone(),
                    available: product.stock,
                    requested: *qty,
                });
            }
        }

        // All checks passed while holding the write lock; apply.
        for product in data.products.iter_mut() {
            if let Some(qty) = required.get(product.id.as_str()) {
                product.stock -= qty;
            }
        }

        debug!(lines = lines.len(), "stock batch applied");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Services
    // -------------------------------------------------------------------------

    async fn insert_service(&self, service: Service) -> StoreResult<()> {
        debug!(id = %service.id, "inserting service");
        self.data.write().await.services.push(service);
        Ok(())
    }

    async fn get_service(&self, id: &str) -> StoreResult<Option<Service>> {
        let data = self.data.read().await;
        Ok(data.services.iter().find(|s| s.id == id).cloned())
    }

    async fn update_service(&self, service: Service) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let slot = data
            .services
            .iter_mut()
            .find(|s| s.id == service.id)
            .ok_or_else(|| StoreError::not_found("Service", &service.id))?;
        *slot = service;
        Ok(())
    }

    async fn delete_service(&self, id: &str) -> StoreResult<Service> {
        let mut data = self.data.write().await;
        let idx = data
            .services
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| StoreError::not_found("Service", id))?;
        Ok(data.services.remove(idx))
    }

    async fn list_services(&self, owner: Option<&str>) -> StoreResult<Vec<Service>> {
        let data = self.data.read().await;
        Ok(filter_owned(&data.services, owner, |s| &s.owner_id))
    }

    // -------------------------------------------------------------------------
    // Customers
    // -------------------------------------------------------------------------

    async fn insert_customer(&self, customer: Customer) -> StoreResult<()> {
        debug!(id = %customer.id, "inserting customer");
        self.data.write().await.customers.push(customer);
        Ok(())
    }

    async fn list_customers(&self, owner: Option<&str>) -> StoreResult<Vec<Customer>> {
        let data = self.data.read().await;
        Ok(filter_owned(&data.customers, owner, |c| &c.owner_id))
    }

    // -------------------------------------------------------------------------
    // Quotes
    // -------------------------------------------------------------------------

    async fn insert_quote(&self, quote: Quote) -> StoreResult<()> {
        debug!(id = %quote.id, items = quote.items.len(), "inserting quote");
        self.data.write().await.quotes.push(quote);
        Ok(())
    }

    async fn get_quote(&self, id: &str) -> StoreResult<Option<Quote>> {
        let data = self.data.read().await;
        Ok(data.quotes.iter().find(|q| q.id == id).cloned())
    }

    async fn list_quotes(&self, owner: Option<&str>) -> StoreResult<Vec<Quote>> {
        let data = self.data.read().await;
        Ok(filter_owned(&data.quotes, owner, |q| &q.owner_id))
    }

    async fn mark_quote_converted(&self, id: &str) -> StoreResult<()> {
        let mut data = self.data.write().await;
        let quote = data
            .quotes
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| StoreError::not_found("Quote", id))?;

        if quote.status != QuoteStatus::Open {
            return Err(StoreError::StateConflict {
                entity: "Quote",
                id: id.to_string(),
                state: "converted".to_string(),
            });
        }

        quote.status = QuoteStatus::Converted;
        debug!(id = %id, "quote marked converted");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Sales
    // -------------------------------------------------------------------------

    async fn insert_sale(&self, sale: Sale) -> StoreResult<()> {
        debug!(id = %sale.id, total = %sale.total, "inserting sale");
        self.data.write().await.sales.push(sale);
        Ok(())
    }

    async fn list_sales(&self, owner: Option<&str>) -> StoreResult<Vec<Sale>> {
        let data = self.data.read().await;
        Ok(filter_owned(&data.sales, owner, |s| &s.owner_id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
