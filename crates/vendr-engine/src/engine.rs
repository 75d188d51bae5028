//! # Quote/Sale Engine
//!
//! Quote creation, quote-to-sale conversion and direct sales.
//!
//! ## Conversion Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    convert_quote(quote_id, caller)                  │
//! │                                                                     │
//! │  1. load quote ──────────────► NotFound                             │
//! │  2. status == open? ─────────► AlreadyConverted (exactly-once)      │
//! │  3. re-validate vs CURRENT catalog                                  │
//! │       product line: exists? ─► InvalidReference                     │
//! │                     stock ≥ qty? ► InsufficientStock (abort all)    │
//! │       service line: exists? ─► InvalidReference                     │
//! │  4. recompute total (stored override, else current price)           │
//! │  5. decrement ALL product lines as one batch (all-or-nothing)       │
//! │  6. persist Sale (product lines only + receipt snapshot)            │
//! │  7. mark quote converted (terminal)                                 │
//! │                                                                     │
//! │  Steps 1-7 run behind one write gate: no other conversion or        │
//! │  direct sale interleaves with the stock check.                      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Totals
//! A quote's persisted total is frozen at creation. Conversion recomputes
//! the total from current catalog prices (stored overrides still win), so
//! the sale's total may diverge from the quote's displayed total if prices
//! moved in between. Both figures are kept on the sale (`total` and
//! `quoted_total`) and a divergence is logged: observed behavior of the
//! system this replaces, surfaced instead of silently picking one figure.

use std::sync::Arc;

use chrono::Utc;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use vendr_core::{
    new_entity_id, validation, Caller, LineItem, LineItemKind, Money, Quote, QuoteStatus, Receipt,
    ReceiptLine, Sale, SaleItem,
};
use vendr_store::{StockDecrement, Store};

use crate::error::{EngineError, EngineResult};

// =============================================================================
// Requests
// =============================================================================

/// One line of a direct sale request. Product-only: service lines are not
/// permitted in a direct sale; quote conversion is the path that carries
/// services into a total.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineRequest {
    pub product_id: String,
    pub qty: u32,
    /// Optional unit-price override; beats the catalog price.
    pub price: Option<Money>,
}

// =============================================================================
// Engine
// =============================================================================

/// The single mutation point for stock.
///
/// Holds an injected store handle and a write gate serializing every
/// mutating operation (conversion, direct sale). The gate is what makes
/// "check stock, then decrement" safe against a concurrent conversion
/// hitting the same product; reads never take it.
pub struct QuoteSaleEngine {
    store: Arc<dyn Store>,
    write_gate: Mutex<()>,
}

impl QuoteSaleEngine {
    pub fn new(store: Arc<dyn Store>) -> Self {
        QuoteSaleEngine {
            store,
            write_gate: Mutex::new(()),
        }
    }

    // -------------------------------------------------------------------------
    // Create Quote
    // -------------------------------------------------------------------------

    /// Creates an open quote. Quotes are non-binding estimates: references
    /// are validated and the total is computed, but stock is neither
    /// checked nor reserved.
    ///
    /// Validation fails fast on the first violation, in request order:
    /// non-empty items, then per-item shape, then reference resolution.
    pub async fn create_quote(
        &self,
        owner_id: &str,
        customer_id: Option<String>,
        items: Vec<LineItem>,
    ) -> EngineResult<Quote> {
        debug!(owner = %owner_id, items = items.len(), "create_quote");

        validation::validate_items_non_empty(&items)?;
        for item in &items {
            validate_line_shape(item.qty, &item.ref_id, item.price)?;
        }

        // Resolve references kind by kind, products first, so a dangling
        // product id is reported before a dangling service id.
        let mut effective = vec![Money::zero(); items.len()];
        for kind in [LineItemKind::Product, LineItemKind::Service] {
            for (i, item) in items.iter().enumerate() {
                if item.kind == kind {
                    effective[i] = self.effective_quote_price(item).await?;
                }
            }
        }

        let mut total = Money::zero();
        for (item, price) in items.iter().zip(&effective) {
            total += price.line_subtotal(item.qty);
        }

        let quote = Quote {
            id: new_entity_id(),
            owner_id: owner_id.to_string(),
            customer_id,
            items,
            total,
            status: QuoteStatus::Open,
            created_at: Utc::now(),
        };

        self.store.insert_quote(quote.clone()).await?;
        info!(id = %quote.id, total = %quote.total, "quote created");
        Ok(quote)
    }

    /// Resolves a line's effective unit price at quote time: the explicit
    /// override when present, else the current catalog price. The
    /// reference must resolve either way; an override doesn't excuse a
    /// dangling id.
    async fn effective_quote_price(&self, item: &LineItem) -> EngineResult<Money> {
        let catalog_price = match item.kind {
            LineItemKind::Product => {
                self.store
                    .get_product(&item.ref_id)
                    .await?
                    .ok_or_else(|| EngineError::invalid_reference("product", &item.ref_id))?
                    .price
            }
            LineItemKind::Service => {
                self.store
                    .get_service(&item.ref_id)
                    .await?
                    .ok_or_else(|| EngineError::invalid_reference("service", &item.ref_id))?
                    .price
            }
        };
        Ok(item.price.unwrap_or(catalog_price))
    }

    // -------------------------------------------------------------------------
    // Convert Quote
    // -------------------------------------------------------------------------

    /// Converts an open quote into a sale, decrementing stock for every
    /// product line as one all-or-nothing batch.
    ///
    /// The sale's owner is the converting caller: an admin may convert on
    /// behalf of another owner, and the resulting sale is recorded against
    /// the admin, not the quote's original owner.
    pub async fn convert_quote(&self, quote_id: &str, caller_id: &str) -> EngineResult<Sale> {
        let _gate = self.write_gate.lock().await;
        debug!(quote = %quote_id, caller = %caller_id, "convert_quote");

        let quote = self
            .store
            .get_quote(quote_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Quote", quote_id))?;

        if quote.status != QuoteStatus::Open {
            return Err(EngineError::AlreadyConverted {
                quote_id: quote_id.to_string(),
            });
        }

        // Re-validate every line against the CURRENT catalog, not the
        // snapshot taken at quote creation. Nothing is mutated until every
        // line has passed.
        let mut total = Money::zero();
        let mut decrements = Vec::new();
        let mut sale_items = Vec::new();
        let mut receipt_lines = Vec::new();

        for item in &quote.items {
            match item.kind {
                LineItemKind::Product => {
                    let product = self
                        .store
                        .get_product(&item.ref_id)
                        .await?
                        .ok_or_else(|| EngineError::invalid_reference("product", &item.ref_id))?;

                    if product.stock < i64::from(item.qty) {
                        return Err(EngineError::InsufficientStock {
                            product_id: product.id,
                            available: product.stock,
                            requested: i64::from(item.qty),
                        });
                    }

                    let price = item.price.unwrap_or(product.price);
                    let subtotal = price.line_subtotal(item.qty);
                    total += subtotal;

                    decrements.push(StockDecrement {
                        product_id: product.id.clone(),
                        qty: item.qty,
                    });
                    sale_items.push(SaleItem {
                        product_id: product.id,
                        qty: item.qty,
                        price,
                    });
                    receipt_lines.push(ReceiptLine {
                        description: product.name,
                        qty: item.qty,
                        unit_price: price,
                        subtotal,
                    });
                }
                LineItemKind::Service => {
                    let service = self
                        .store
                        .get_service(&item.ref_id)
                        .await?
                        .ok_or_else(|| EngineError::invalid_reference("service", &item.ref_id))?;

                    let price = item.price.unwrap_or(service.price);
                    let subtotal = price.line_subtotal(item.qty);
                    total += subtotal;

                    // No stock, no sale item: the service's value lands in
                    // the total and on the receipt only.
                    receipt_lines.push(ReceiptLine {
                        description: service.name,
                        qty: item.qty,
                        unit_price: price,
                        subtotal,
                    });
                }
            }
        }

        // The batch re-checks under the store's own lock and aggregates
        // duplicate product lines; it is the authoritative check.
        self.store.decrement_stock_batch(&decrements).await?;

        if total != quote.total {
            warn!(
                quote = %quote_id,
                quoted_total = %quote.total,
                sale_total = %total,
                "catalog prices changed between quoting and converting"
            );
        }

        let now = Utc::now();
        let sale = Sale {
            id: new_entity_id(),
            owner_id: caller_id.to_string(),
            customer_id: quote.customer_id.clone(),
            items: sale_items,
            total,
            created_at: now,
            quoted_total: Some(quote.total),
            receipt: Some(Receipt::at(now, receipt_lines, total)),
        };

        self.store.insert_sale(sale.clone()).await?;
        self.store.mark_quote_converted(quote_id).await?;

        info!(quote = %quote_id, sale = %sale.id, total = %sale.total, "quote converted");
        Ok(sale)
    }

    // -------------------------------------------------------------------------
    // Create Sale directly
    // -------------------------------------------------------------------------

    /// Creates a sale without a quote: same validate-then-decrement
    /// contract as conversion, restricted to product lines.
    pub async fn create_sale(
        &self,
        owner_id: &str,
        customer_id: Option<String>,
        lines: Vec<SaleLineRequest>,
    ) -> EngineResult<Sale> {
        let _gate = self.write_gate.lock().await;
        debug!(owner = %owner_id, lines = lines.len(), "create_sale");

        validation::validate_items_non_empty(&lines)?;
        for line in &lines {
            validate_line_shape(line.qty, &line.product_id, line.price)?;
        }

        let mut total = Money::zero();
        let mut decrements = Vec::new();
        let mut sale_items = Vec::new();
        let mut receipt_lines = Vec::new();

        for line in &lines {
            let product = self
                .store
                .get_product(&line.product_id)
                .await?
                .ok_or_else(|| EngineError::invalid_reference("product", &line.product_id))?;

            if product.stock < i64::from(line.qty) {
                return Err(EngineError::InsufficientStock {
                    product_id: product.id,
                    available: product.stock,
                    requested: i64::from(line.qty),
                });
            }

            let price = line.price.unwrap_or(product.price);
            let subtotal = price.line_subtotal(line.qty);
            total += subtotal;

            decrements.push(StockDecrement {
                product_id: product.id.clone(),
                qty: line.qty,
            });
            sale_items.push(SaleItem {
                product_id: product.id,
                qty: line.qty,
                price,
            });
            receipt_lines.push(ReceiptLine {
                description: product.name,
                qty: line.qty,
                unit_price: price,
                subtotal,
            });
        }

        self.store.decrement_stock_batch(&decrements).await?;

        let now = Utc::now();
        let sale = Sale {
            id: new_entity_id(),
            owner_id: owner_id.to_string(),
            customer_id,
            items: sale_items,
            total,
            created_at: now,
            quoted_total: None,
            receipt: Some(Receipt::at(now, receipt_lines, total)),
        };

        self.store.insert_sale(sale.clone()).await?;
        info!(sale = %sale.id, total = %sale.total, "sale created");
        Ok(sale)
    }

    // -------------------------------------------------------------------------
    // Listings
    // -------------------------------------------------------------------------

    /// Quotes visible to the caller: all for admins, own otherwise.
    pub async fn list_quotes(&self, caller: &Caller) -> EngineResult<Vec<Quote>> {
        Ok(self.store.list_quotes(owner_scope(caller)).await?)
    }

    /// Sales visible to the caller: all for admins, own otherwise.
    pub async fn list_sales(&self, caller: &Caller) -> EngineResult<Vec<Sale>> {
        Ok(self.store.list_sales(owner_scope(caller)).await?)
    }
}

/// Admin sees everything; everyone else only their own records.
pub(crate) fn owner_scope(caller: &Caller) -> Option<&str> {
    if caller.admin {
        None
    } else {
        Some(caller.id.as_str())
    }
}

/// Shape checks shared by quote lines and direct sale lines: positive
/// quantity, non-empty reference, non-negative override.
fn validate_line_shape(qty: u32, ref_id: &str, price: Option<Money>) -> EngineResult<()> {
    validation::validate_ref_id(ref_id)?;
    validation::validate_qty(qty)?;
    if let Some(price) = price {
        validation::validate_price(price)?;
    }
    Ok(())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use rust_decimal_macros::dec;

    use vendr_core::{PlanId, Product, Service};
    use vendr_store::MemoryStore;

    fn money(d: rust_decimal::Decimal) -> Money {
        Money::new(d)
    }

    async fn store_with_product(id: &str, price: Money, stock: i64) -> Arc<MemoryStore> {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_product(Product {
                id: id.to_string(),
                owner_id: "alice".to_string(),
                name: format!("product {id}"),
                sku: format!("SKU-{id}"),
                barcode: None,
                price,
                stock,
            })
            .await
            .unwrap();
        store
    }

    fn product_line(id: &str, qty: u32) -> LineItem {
        LineItem {
            kind: LineItemKind::Product,
            ref_id: id.to_string(),
            qty,
            price: None,
        }
    }

    #[tokio::test]
    async fn quote_total_rounds_per_line() {
        let store = store_with_product("p1", money(dec!(10.005)), 100).await;
        let engine = QuoteSaleEngine::new(store);

        let quote = engine
            .create_quote("alice", None, vec![product_line("p1", 2)])
            .await
            .unwrap();

        // qty × unit price rounds half-up at the line: 2 × 10.005 → 20.01
        assert_eq!(quote.total, money(dec!(20.01)));
    }

    #[tokio::test]
    async fn quote_does_not_touch_stock() {
        let store = store_with_product("p1", money(dec!(5.00)), 10).await;
        let engine = QuoteSaleEngine::new(store.clone());

        engine
            .create_quote("alice", None, vec![product_line("p1", 3)])
            .await
            .unwrap();

        assert_eq!(store.get_product("p1").await.unwrap().unwrap().stock, 10);
    }

    #[tokio::test]
    async fn quote_allows_oversubscribed_stock() {
        let store = store_with_product("p1", money(dec!(5.00)), 2).await;
        let engine = QuoteSaleEngine::new(store);

        // Quotes are estimates; asking for more than stock is fine.
        let quote = engine
            .create_quote("alice", None, vec![product_line("p1", 50)])
            .await
            .unwrap();
        assert_eq!(quote.status, QuoteStatus::Open);
    }

    #[tokio::test]
    async fn quote_rejects_dangling_reference_even_with_override() {
        let store = store_with_product("p1", money(dec!(5.00)), 10).await;
        let engine = QuoteSaleEngine::new(store);

        let err = engine
            .create_quote(
                "alice",
                None,
                vec![LineItem {
                    kind: LineItemKind::Product,
                    ref_id: "ghost".to_string(),
                    qty: 1,
                    price: Some(money(dec!(9.99))),
                }],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::InvalidReference { .. }));
    }

    #[tokio::test]
    async fn quote_rejects_empty_items() {
        let store = Arc::new(MemoryStore::new());
        let engine = QuoteSaleEngine::new(store);

        let err = engine.create_quote("alice", None, vec![]).await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn quote_price_override_wins_over_catalog() {
        let store = store_with_product("p1", money(dec!(5.00)), 10).await;
        let engine = QuoteSaleEngine::new(store);

        let quote = engine
            .create_quote(
                "alice",
                None,
                vec![LineItem {
                    kind: LineItemKind::Product,
                    ref_id: "p1".to_string(),
                    qty: 2,
                    price: Some(money(dec!(4.50))),
                }],
            )
            .await
            .unwrap();

        assert_eq!(quote.total, money(dec!(9.00)));
    }

    #[tokio::test]
    async fn convert_quote_end_to_end() {
        let store = store_with_product("p1", money(dec!(5.00)), 10).await;
        let engine = QuoteSaleEngine::new(store.clone());

        let quote = engine
            .create_quote("alice", Some("c1".to_string()), vec![product_line("p1", 3)])
            .await
            .unwrap();
        let sale = engine.convert_quote(&quote.id, "alice").await.unwrap();

        assert_eq!(sale.total, money(dec!(15.00)));
        assert_eq!(sale.quoted_total, Some(money(dec!(15.00))));
        assert_eq!(sale.customer_id.as_deref(), Some("c1"));
        assert_eq!(sale.items.len(), 1);
        assert_eq!(sale.items[0].qty, 3);
        assert_eq!(store.get_product("p1").await.unwrap().unwrap().stock, 7);

        let stored = store.get_quote(&quote.id).await.unwrap().unwrap();
        assert_eq!(stored.status, QuoteStatus::Converted);
    }

    #[tokio::test]
    async fn convert_quote_is_exactly_once() {
        let store = store_with_product("p1", money(dec!(5.00)), 10).await;
        let engine = QuoteSaleEngine::new(store.clone());

        let quote = engine
            .create_quote("alice", None, vec![product_line("p1", 3)])
            .await
            .unwrap();
        engine.convert_quote(&quote.id, "alice").await.unwrap();

        let err = engine.convert_quote(&quote.id, "alice").await.unwrap_err();
        assert!(matches!(err, EngineError::AlreadyConverted { .. }));
        // Stock decremented exactly once.
        assert_eq!(store.get_product("p1").await.unwrap().unwrap().stock, 7);
    }

    #[tokio::test]
    async fn convert_rolls_back_nothing_on_partial_shortfall() {
        let store = store_with_product("a", money(dec!(1.00)), 10).await;
        store
            .insert_product(Product {
                id: "b".to_string(),
                owner_id: "alice".to_string(),
                name: "product b".to_string(),
                sku: "SKU-b".to_string(),
                barcode: None,
                price: money(dec!(1.00)),
                stock: 3,
            })
            .await
            .unwrap();
        let engine = QuoteSaleEngine::new(store.clone());

        let quote = engine
            .create_quote(
                "alice",
                None,
                vec![product_line("a", 5), product_line("b", 5)],
            )
            .await
            .unwrap();

        let err = engine.convert_quote(&quote.id, "alice").await.unwrap_err();
        assert!(matches!(err, EngineError::InsufficientStock { .. }));

        // All-or-nothing: the passing line was not applied either.
        assert_eq!(store.get_product("a").await.unwrap().unwrap().stock, 10);
        assert_eq!(store.get_product("b").await.unwrap().unwrap().stock, 3);
        // Quote stays open and re-convertible once stock allows.
        let stored = store.get_quote(&quote.id).await.unwrap().unwrap();
        assert_eq!(stored.status, QuoteStatus::Open);
    }

    #[tokio::test]
    async fn convert_after_product_deletion_is_invalid_reference() {
        let store = store_with_product("p1", money(dec!(5.00)), 10).await;
        let engine = QuoteSaleEngine::new(store.clone());

        let quote = engine
            .create_quote("alice", None, vec![product_line("p1", 2)])
            .await
            .unwrap();
        store.delete_product("p1").await.unwrap();

        let err = engine.convert_quote(&quote.id, "alice").await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidReference { .. }));

        // The whole conversion aborted: quote still open, nothing sold.
        let stored = store.get_quote(&quote.id).await.unwrap().unwrap();
        assert_eq!(stored.status, QuoteStatus::Open);
        assert!(store.list_sales(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn convert_after_service_deletion_is_invalid_reference() {
        let store = store_with_product("p1", money(dec!(5.00)), 10).await;
        store
            .insert_service(Service {
                id: "s1".to_string(),
                owner_id: "alice".to_string(),
                name: "Setup".to_string(),
                price: money(dec!(20.00)),
            })
            .await
            .unwrap();
        let engine = QuoteSaleEngine::new(store.clone());

        let quote = engine
            .create_quote(
                "alice",
                None,
                vec![
                    product_line("p1", 2),
                    LineItem {
                        kind: LineItemKind::Service,
                        ref_id: "s1".to_string(),
                        qty: 1,
                        price: None,
                    },
                ],
            )
            .await
            .unwrap();
        store.delete_service("s1").await.unwrap();

        let err = engine.convert_quote(&quote.id, "alice").await.unwrap_err();
        assert!(matches!(err, EngineError::InvalidReference { .. }));

        // The product line passed validation but nothing was decremented.
        assert_eq!(store.get_product("p1").await.unwrap().unwrap().stock, 10);
        let stored = store.get_quote(&quote.id).await.unwrap().unwrap();
        assert_eq!(stored.status, QuoteStatus::Open);
    }

    #[tokio::test]
    async fn service_only_quote_converts_without_stock() {
        let store = Arc::new(MemoryStore::new());
        store
            .insert_service(Service {
                id: "s1".to_string(),
                owner_id: "alice".to_string(),
                name: "Installation".to_string(),
                price: money(dec!(30.00)),
            })
            .await
            .unwrap();
        let engine = QuoteSaleEngine::new(store);

        let quote = engine
            .create_quote(
                "alice",
                None,
                vec![LineItem {
                    kind: LineItemKind::Service,
                    ref_id: "s1".to_string(),
                    qty: 2,
                    price: None,
                }],
            )
            .await
            .unwrap();
        let sale = engine.convert_quote(&quote.id, "alice").await.unwrap();

        // Services contribute to the total and receipt but not sale items.
        assert!(sale.items.is_empty());
        assert_eq!(sale.total, money(dec!(60.00)));
        let receipt = sale.receipt.unwrap();
        assert_eq!(receipt.lines.len(), 1);
        assert_eq!(receipt.lines[0].description, "Installation");
        assert_eq!(receipt.total, money(dec!(60.00)));
    }

    #[tokio::test]
    async fn convert_uses_current_catalog_price_and_keeps_quoted_total() {
        let store = store_with_product("p1", money(dec!(5.00)), 10).await;
        let engine = QuoteSaleEngine::new(store.clone());

        let quote = engine
            .create_quote("alice", None, vec![product_line("p1", 2)])
            .await
            .unwrap();
        assert_eq!(quote.total, money(dec!(10.00)));

        // Catalog price changes after quoting.
        let mut product = store.get_product("p1").await.unwrap().unwrap();
        product.price = money(dec!(6.00));
        store.update_product(product).await.unwrap();

        let sale = engine.convert_quote(&quote.id, "alice").await.unwrap();
        assert_eq!(sale.total, money(dec!(12.00)));
        assert_eq!(sale.quoted_total, Some(money(dec!(10.00))));
    }

    #[tokio::test]
    async fn convert_sale_owner_is_the_converting_caller() {
        let store = store_with_product("p1", money(dec!(5.00)), 10).await;
        let engine = QuoteSaleEngine::new(store);

        let quote = engine
            .create_quote("alice", None, vec![product_line("p1", 1)])
            .await
            .unwrap();
        let sale = engine.convert_quote(&quote.id, "admin").await.unwrap();

        assert_eq!(sale.owner_id, "admin");
    }

    #[tokio::test]
    async fn convert_unknown_quote_is_not_found() {
        let store = Arc::new(MemoryStore::new());
        let engine = QuoteSaleEngine::new(store);

        let err = engine.convert_quote("ghost", "alice").await.unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[tokio::test]
    async fn create_sale_decrements_and_writes_receipt() {
        let store = store_with_product("p1", money(dec!(5.00)), 10).await;
        let engine = QuoteSaleEngine::new(store.clone());

        let sale = engine
            .create_sale(
                "alice",
                None,
                vec![SaleLineRequest {
                    product_id: "p1".to_string(),
                    qty: 3,
                    price: None,
                }],
            )
            .await
            .unwrap();

        assert_eq!(sale.total, money(dec!(15.00)));
        assert_eq!(sale.quoted_total, None);
        assert_eq!(store.get_product("p1").await.unwrap().unwrap().stock, 7);

        let receipt = sale.receipt.unwrap();
        assert_eq!(receipt.lines[0].qty, 3);
        assert_eq!(receipt.lines[0].unit_price, money(dec!(5.00)));
        assert_eq!(receipt.lines[0].subtotal, money(dec!(15.00)));
    }

    #[tokio::test]
    async fn create_sale_over_stock_persists_nothing() {
        let store = store_with_product("p1", money(dec!(5.00)), 2).await;
        let engine = QuoteSaleEngine::new(store.clone());

        let err = engine
            .create_sale(
                "alice",
                None,
                vec![SaleLineRequest {
                    product_id: "p1".to_string(),
                    qty: 3,
                    price: None,
                }],
            )
            .await
            .unwrap_err();

        assert!(matches!(err, EngineError::InsufficientStock { .. }));
        assert_eq!(store.get_product("p1").await.unwrap().unwrap().stock, 2);
        assert!(store.list_sales(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn concurrent_conversions_on_shared_stock_admit_exactly_one() {
        let store = store_with_product("p1", money(dec!(5.00)), 5).await;
        let engine = Arc::new(QuoteSaleEngine::new(store.clone()));

        // Two open quotes each want 3 of a stock of 5.
        let q1 = engine
            .create_quote("alice", None, vec![product_line("p1", 3)])
            .await
            .unwrap();
        let q2 = engine
            .create_quote("alice", None, vec![product_line("p1", 3)])
            .await
            .unwrap();

        let e1 = engine.clone();
        let e2 = engine.clone();
        let id1 = q1.id.clone();
        let id2 = q2.id.clone();
        let (r1, r2) = tokio::join!(
            tokio::spawn(async move { e1.convert_quote(&id1, "alice").await }),
            tokio::spawn(async move { e2.convert_quote(&id2, "alice").await }),
        );
        let r1 = r1.unwrap();
        let r2 = r2.unwrap();

        assert_eq!(r1.is_ok() as u8 + r2.is_ok() as u8, 1);
        let failed = if r1.is_err() { r1 } else { r2 };
        assert!(matches!(
            failed.unwrap_err(),
            EngineError::InsufficientStock { .. }
        ));
        assert_eq!(store.get_product("p1").await.unwrap().unwrap().stock, 2);
        assert_eq!(store.list_sales(None).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn listings_are_owner_scoped() {
        let store = store_with_product("p1", money(dec!(5.00)), 100).await;
        let engine = QuoteSaleEngine::new(store);

        engine
            .create_quote("alice", None, vec![product_line("p1", 1)])
            .await
            .unwrap();
        engine
            .create_quote("bob", None, vec![product_line("p1", 1)])
            .await
            .unwrap();

        let alice = Caller::user("alice", PlanId::Gratis);
        let admin = Caller::admin("root");

        assert_eq!(engine.list_quotes(&alice).await.unwrap().len(), 1);
        assert_eq!(engine.list_quotes(&admin).await.unwrap().len(), 2);
    }
}
