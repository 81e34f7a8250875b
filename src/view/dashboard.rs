//! Dashboard page views

use serde::Serialize;

use super::container::{FetchKey, ViewContainer};
use super::state::ViewState;
use crate::client::{BackendClient, DashboardStats, DashboardSummary, Order};

pub const STATS_ERROR: &str = "Failed to load dashboard stats";
pub const ORDERS_ERROR: &str = "Failed to load recent orders";
pub const SUMMARY_ERROR: &str = "Failed to load dashboard summary";

/// The three data needs of the dashboard page, fetched independently
pub struct DashboardView {
    pub stats: ViewContainer<DashboardStats>,
    pub orders: ViewContainer<Vec<Order>>,
    pub summary: ViewContainer<DashboardSummary>,
    month: u32,
    year: i32,
}

/// Settled states of every dashboard container
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub stats: ViewState<DashboardStats>,
    pub orders: ViewState<Vec<Order>>,
    pub summary: ViewState<DashboardSummary>,
}

impl DashboardView {
    /// Views for the summary period `month`/`year`
    pub fn new(month: u32, year: i32) -> Self {
        Self {
            stats: ViewContainer::new(
                FetchKey::new("dashboard stats"),
                DashboardStats::default(),
                STATS_ERROR,
            ),
            orders: ViewContainer::new(FetchKey::new("recent orders"), Vec::new(), ORDERS_ERROR),
            summary: ViewContainer::new(
                FetchKey::new("dashboard summary")
                    .param("month", month)
                    .param("year", year),
                DashboardSummary::default(),
                SUMMARY_ERROR,
            ),
            month,
            year,
        }
    }

    /// Start all three fetches concurrently
    pub fn mount(&self, client: &BackendClient) {
        let c = client.clone();
        self.stats.mount(async move { c.dashboard_stats().await });

        let c = client.clone();
        self.orders.mount(async move { c.recent_orders().await });

        let c = client.clone();
        let (month, year) = (self.month, self.year);
        self.summary
            .mount(async move { c.dashboard_summary(month, year).await });
    }

    pub async fn settled(&self) -> DashboardSnapshot {
        let (stats, orders, summary) =
            tokio::join!(self.stats.settled(), self.orders.settled(), self.summary.settled());

        DashboardSnapshot {
            stats,
            orders,
            summary,
        }
    }

    pub fn teardown(&self) {
        self.stats.teardown();
        self.orders.teardown();
        self.summary.teardown();
    }
}
