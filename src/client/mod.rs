//! Backend REST Client
//!
//! Typed access to the dashboard backend. Each method issues exactly one
//! request and either decodes the JSON body or fails with a generic
//! [`ClientError`]; there is no retry, backoff or request timeout.
//!
//! ## Resources
//!
//! - `GET {base}/dashboard/stats` - [`DashboardStats`]
//! - `GET {base}/orders/recent` - list of [`Order`]
//! - `GET {base}/dashboard-summary?month=&year=` - [`DashboardSummary`]
//!
//! [`ReportClient`] submits issue reports to the Tally server itself.

mod backend;
mod error;
mod report;
mod types;

pub use backend::{BackendClient, BackendConfig, DEFAULT_API_URL};
pub use error::{ClientError, ClientResult};
pub use report::ReportClient;
pub use types::{DashboardStats, DashboardSummary, Order, SummaryGroup};
