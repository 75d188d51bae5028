//! # Catalog Service
//!
//! Product and service catalog management: plan-gated creation, owner-or-
//! admin guarded mutation, barcode lookup, and direct stock adjustment.
//!
//! ## Plan Gating
//! Product creation counts the caller's existing products against their
//! tier cap (`None` = unbounded). Services carry no cap: the original
//! system never limited them and this one doesn't either. Plans never
//! affect sale/quote math.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, info};

use vendr_core::{
    new_entity_id,
    plan::{present_field, PlanLimits},
    validation, Caller, Money, PlanRegistry, Product, Service,
};
use vendr_store::Store;

use crate::engine::owner_scope;
use crate::error::{EngineError, EngineResult};

// =============================================================================
// Requests
// =============================================================================

/// Fields for a new product. Stock and price are validated non-negative
/// before anything touches the store.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub name: String,
    #[serde(default)]
    pub sku: String,
    pub barcode: Option<String>,
    pub price: Money,
    pub stock: i64,
}

/// Partial product update; absent fields keep their stored value.
///
/// The barcode uses a double Option: absent = keep, explicit null = clear,
/// value = replace. The other fields have no meaningful "cleared" state.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub sku: Option<String>,
    #[serde(default, deserialize_with = "present_field")]
    pub barcode: Option<Option<String>>,
    pub price: Option<Money>,
    pub stock: Option<i64>,
}

/// Fields for a new service. No stock, no cap.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateService {
    pub name: String,
    pub price: Money,
}

/// Partial service update.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePatch {
    pub name: Option<String>,
    pub price: Option<Money>,
}

// =============================================================================
// Service
// =============================================================================

/// Catalog operations over an injected store handle and the plan registry.
pub struct CatalogService {
    store: Arc<dyn Store>,
    plans: Arc<PlanRegistry>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn Store>, plans: Arc<PlanRegistry>) -> Self {
        CatalogService { store, plans }
    }

    // -------------------------------------------------------------------------
    // Products
    // -------------------------------------------------------------------------

    /// Products visible to the caller: all for admins, own otherwise.
    pub async fn list_products(&self, caller: &Caller) -> EngineResult<Vec<Product>> {
        Ok(self.store.list_products(owner_scope(caller)).await?)
    }

    /// Creates a product owned by the caller, enforcing the caller's plan
    /// product cap.
    pub async fn create_product(
        &self,
        caller: &Caller,
        req: CreateProduct,
    ) -> EngineResult<Product> {
        debug!(owner = %caller.id, name = %req.name, "create_product");

        validation::validate_name(&req.name)?;
        validation::validate_price(req.price)?;
        validation::validate_stock(req.stock)?;

        let plan = self.plans.get(caller.plan);
        let owned = self.store.list_products(Some(&caller.id)).await?.len();
        if !PlanLimits::allows(plan.limits.products, owned) {
            return Err(EngineError::LimitExceeded {
                resource: "products",
                // allows() only fails on a finite cap
                limit: plan.limits.products.unwrap_or(0),
            });
        }

        let product = Product {
            id: new_entity_id(),
            owner_id: caller.id.clone(),
            name: req.name,
            sku: req.sku,
            barcode: req.barcode,
            price: req.price,
            stock: req.stock,
        };

        self.store.insert_product(product.clone()).await?;
        info!(id = %product.id, owner = %product.owner_id, "product created");
        Ok(product)
    }

    /// Applies a partial update. Owner-or-admin guarded; last write wins.
    pub async fn update_product(
        &self,
        caller: &Caller,
        id: &str,
        patch: ProductPatch,
    ) -> EngineResult<Product> {
        let mut product = self
            .store
            .get_product(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Product", id))?;

        if !caller.can_access(&product.owner_id) {
            return Err(EngineError::Forbidden);
        }

        if let Some(name) = patch.name {
            validation::validate_name(&name)?;
            product.name = name;
        }
        if let Some(sku) = patch.sku {
            product.sku = sku;
        }
        if let Some(barcode) = patch.barcode {
            product.barcode = barcode;
        }
        if let Some(price) = patch.price {
            validation::validate_price(price)?;
            product.price = price;
        }
        if let Some(stock) = patch.stock {
            validation::validate_stock(stock)?;
            product.stock = stock;
        }

        self.store.update_product(product.clone()).await?;
        debug!(id = %id, "product updated");
        Ok(product)
    }

    /// Deletes the product and returns the removed record.
    pub async fn delete_product(&self, caller: &Caller, id: &str) -> EngineResult<Product> {
        let product = self
            .store
            .get_product(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Product", id))?;

        if !caller.can_access(&product.owner_id) {
            return Err(EngineError::Forbidden);
        }

        let removed = self.store.delete_product(id).await?;
        info!(id = %id, "product deleted");
        Ok(removed)
    }

    /// Looks a product up by barcode or SKU within the caller's visible
    /// pool; this is what a scanner gun resolves against.
    pub async fn find_by_barcode(&self, caller: &Caller, code: &str) -> EngineResult<Product> {
        let pool = self.store.list_products(owner_scope(caller)).await?;
        pool.into_iter()
            .find(|p| p.barcode.as_deref() == Some(code) || p.sku == code)
            .ok_or_else(|| EngineError::not_found("Product", code))
    }

    /// Adjusts stock by `delta` (restocking or correction). A negative
    /// delta that would go below zero fails atomically with the check.
    /// Returns the new stock level.
    pub async fn adjust_stock(&self, id: &str, delta: i64) -> EngineResult<i64> {
        Ok(self.store.adjust_stock(id, delta).await?)
    }

    // -------------------------------------------------------------------------
    // Services (no stock, always purchasable)
    // -------------------------------------------------------------------------

    pub async fn list_services(&self, caller: &Caller) -> EngineResult<Vec<Service>> {
        Ok(self.store.list_services(owner_scope(caller)).await?)
    }

    pub async fn create_service(
        &self,
        caller: &Caller,
        req: CreateService,
    ) -> EngineResult<Service> {
        validation::validate_name(&req.name)?;
        validation::validate_price(req.price)?;

        let service = Service {
            id: new_entity_id(),
            owner_id: caller.id.clone(),
            name: req.name,
            price: req.price,
        };

        self.store.insert_service(service.clone()).await?;
        info!(id = %service.id, owner = %service.owner_id, "service created");
        Ok(service)
    }

    pub async fn update_service(
        &self,
        caller: &Caller,
        id: &str,
        patch: ServicePatch,
    ) -> EngineResult<Service> {
        let mut service = self
            .store
            .get_service(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Service", id))?;

        if !caller.can_access(&service.owner_id) {
            return Err(EngineError::Forbidden);
        }

        if let Some(name) = patch.name {
            validation::validate_name(&name)?;
            service.name = name;
        }
        if let Some(price) = patch.price {
            validation::validate_price(price)?;
            service.price = price;
        }

        self.store.update_service(service.clone()).await?;
        Ok(service)
    }

    pub async fn delete_service(&self, caller: &Caller, id: &str) -> EngineResult<Service> {
        let service = self
            .store
            .get_service(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Service", id))?;

        if !caller.can_access(&service.owner_id) {
            return Err(EngineError::Forbidden);
        }

        let removed = self.store.delete_service(id).await?;
        info!(id = %id, "service deleted");
        Ok(removed)
    }
}

// =============================================================================
// Tests
// =============================================================================
