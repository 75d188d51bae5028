//! # vendr-core: Pure Business Logic for Vendr POS
//!
//! This crate is the **heart** of Vendr POS. It contains the domain model
//! and business rules as pure code with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                       Vendr POS Architecture                        │
//! │                                                                     │
//! │  ┌─────────────────────────────────────────────────────────────┐    │
//! │  │                API layer (excluded from workspace)          │    │
//! │  └────────────────────────────┬────────────────────────────────┘    │
//! │                               │                                     │
//! │  ┌────────────────────────────▼────────────────────────────────┐    │
//! │  │                      vendr-engine                           │    │
//! │  │   Quote/Sale conversion • catalog • customers • metrics     │    │
//! │  └──────────────┬──────────────────────────────┬───────────────┘    │
//! │                 │                              │                    │
//! │  ┌──────────────▼───────────────┐  ┌───────────▼───────────────┐    │
//! │  │   ★ vendr-core (THIS) ★      │  │        vendr-store        │    │
//! │  │                              │  │                           │    │
//! │  │  types • money • plan •      │  │  Store trait + in-memory  │    │
//! │  │  validation • errors         │  │  backend                  │    │
//! │  │                              │  │                           │    │
//! │  │  NO I/O • PURE FUNCTIONS     │  └───────────────────────────┘    │
//! │  └──────────────────────────────┘                                   │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Service, Customer, Quote, Sale)
//! - [`money`] - Decimal money with half-up line-level rounding
//! - [`plan`] - The closed tier registry (gratis/basico/elite)
//! - [`error`] - Validation error types
//! - [`validation`] - Business-shape validation

pub mod error;
pub mod money;
pub mod plan;
pub mod types;
pub mod validation;

// Re-exports for convenience: `use vendr_core::Money` instead of
// `use vendr_core::money::Money`.
pub use error::{ValidationError, ValidationResult};
pub use money::Money;
pub use plan::{Plan, PlanFeatures, PlanId, PlanLimits, PlanPatch, PlanRegistry, SupportTier};
pub use types::*;
