//! # Metrics Aggregator
//!
//! Read-only rollups computed from stored records at query time. Nothing
//! here mutates state or keeps counters of its own, so the numbers are
//! always consistent with what a direct listing would show.
//!
//! Period sums bucket by UTC calendar day and month of each sale's
//! recorded timestamp.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use serde::Serialize;
use tracing::debug;

use vendr_core::{Caller, Money};
use vendr_store::Store;

use crate::engine::owner_scope;
use crate::error::EngineResult;

/// Dashboard snapshot for one caller's view of the system.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsReport {
    /// Sum of sale totals recorded today (UTC calendar day).
    pub sales_today: Money,
    /// Sum of sale totals recorded this month (UTC calendar month).
    pub sales_month: Money,
    pub products: usize,
    pub customers: usize,
}

/// Per-owner record counts for the admin usage rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageReport {
    pub owner_id: String,
    pub products: usize,
    pub services: usize,
    pub customers: usize,
    pub quotes: usize,
    pub sales: usize,
}

pub struct MetricsAggregator {
    store: Arc<dyn Store>,
}

impl MetricsAggregator {
    pub fn new(store: Arc<dyn Store>) -> Self {
        MetricsAggregator { store }
    }

    /// Computes the dashboard snapshot over the caller's visible records
    /// (everything for admins, own records otherwise).
    pub async fn stats(&self, caller: &Caller) -> EngineResult<StatsReport> {
        let scope = owner_scope(caller);
        let sales = self.store.list_sales(scope).await?;
        let products = self.store.list_products(scope).await?.len();
        let customers = self.store.list_customers(scope).await?.len();

        let now = Utc::now();
        let today = now.date_naive();

        let sales_today = sales
            .iter()
            .filter(|s| s.created_at.date_naive() == today)
            .map(|s| s.total)
            .sum();
        let sales_month = sales
            .iter()
            .filter(|s| s.created_at.year() == now.year() && s.created_at.month() == now.month())
            .map(|s| s.total)
            .sum();

        debug!(caller = %caller.id, products, customers, "stats computed");
        Ok(StatsReport {
            sales_today,
            sales_month,
            products,
            customers,
        })
    }

    /// Record counts for one owner across every collection. Admin-facing;
    /// access control lives with the caller, not here.
    pub async fn usage(&self, owner_id: &str) -> EngineResult<UsageReport> {
        let scope = Some(owner_id);
        Ok(UsageReport {
            owner_id: owner_id.to_string(),
            products: self.store.list_products(scope).await?.len(),
            services: self.store.list_services(scope).await?.len(),
            customers: self.store.list_customers(scope).await?.len(),
            quotes: self.store.list_quotes(scope).await?.len(),
            sales: self.store.list_sales(scope).await?.len(),
        })
    }
}
