//! # vendr-store: Storage Layer for Vendr POS
//!
//! One trait, any backend. Business logic in `vendr-engine` works against
//! [`Store`] and never knows whether records live in memory, a document
//! store or a relational database.
//!
//! ## Modules
//!
//! - [`store`] - The `Store` trait (CRUD + atomic stock/status operations)
//! - [`memory`] - In-memory reference backend
//! - [`error`] - Storage error taxonomy

pub mod error;
pub mod memory;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use store::{StockDecrement, Store};
