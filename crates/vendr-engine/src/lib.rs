//! # vendr-engine: Business Operations for Vendr POS
//!
//! This crate composes the domain types from `vendr-core` with a storage
//! handle from `vendr-store` into the operations a point-of-sale backend
//! exposes: catalog management, customer records, the quote → sale
//! pipeline, and read-only metrics.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Vendr POS Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ vendr-engine (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │  ┌────────────┐ ┌────────────┐ ┌──────────────┐ ┌───────────┐ │   │
//! │  │  │  catalog   │ │  customer  │ │    engine    │ │  metrics  │ │   │
//! │  │  │  products  │ │  records   │ │ quote → sale │ │  rollups  │ │   │
//! │  │  │  services  │ │ plan caps  │ │  stock batch │ │  (read)   │ │   │
//! │  │  └────────────┘ └────────────┘ └──────────────┘ └───────────┘ │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Arc<dyn Store>                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    vendr-store (Storage Layer)                  │   │
//! │  │            Store trait, MemoryStore, atomic stock batch         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`engine`] - [`QuoteSaleEngine`]: quotes, conversion, direct sales
//! - [`catalog`] - [`CatalogService`]: product/service CRUD, barcode lookup
//! - [`customer`] - [`CustomerService`]: customer records with plan caps
//! - [`metrics`] - [`MetricsAggregator`]: dashboard stats and usage counts
//! - [`error`] - [`EngineError`]: the operation-level error taxonomy
//!
//! ## Concurrency Model
//!
//! Reads go straight to the store. The two stock-mutating operations
//! (`convert_quote`, `create_sale`) serialize through a single engine-level
//! write gate, so a conversion's status check, stock batch, and sale insert
//! are never interleaved with another writer's.

pub mod catalog;
pub mod customer;
pub mod engine;
pub mod error;
pub mod metrics;

pub use catalog::{CatalogService, CreateProduct, CreateService, ProductPatch, ServicePatch};
pub use customer::{CreateCustomer, CustomerService};
pub use engine::{QuoteSaleEngine, SaleLineRequest};
pub use error::{EngineError, EngineResult};
pub use metrics::{MetricsAggregator, StatsReport, UsageReport};
