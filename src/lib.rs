//! # Tally
//!
//! Operations dashboard toolkit: a typed client for the dashboard backend, a
//! fetch-on-mount view-state layer, form editing and sanitizing helpers, and
//! an issue-report endpoint that relays reports to a contact service.
//!
//! ## Modules
//!
//! - [`client`]: REST client for the dashboard backend
//! - [`view`]: `{data, loading, error}` view state and fetch containers
//! - [`editor`]: caret-position insertion into form fields
//! - [`sanitize`]: HTML to plain-text transforms
//! - [`api`]: issue-report HTTP endpoint with Axum
//! - [`relay`]: upstream contact relay
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use tally::client::{BackendClient, BackendConfig};
//! use tally::view::DashboardView;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BackendClient::new(BackendConfig::new("http://localhost:3001/api"))?;
//!
//!     let view = DashboardView::new(6, 2025);
//!     view.mount(&client);
//!
//!     let snapshot = view.settled().await;
//!     match snapshot.orders.error() {
//!         Some(message) => println!("{}", message),
//!         None => println!("{} recent orders", snapshot.orders.data().len()),
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod editor;
pub mod logging;
pub mod relay;
pub mod sanitize;
pub mod view;

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use client::{
    BackendClient, BackendConfig, ClientError, DashboardStats, DashboardSummary, Order,
    ReportClient,
};

pub use config::{Config, ConfigError, LoadedConfig, LoggingConfig};

pub use editor::{insert_variable, InsertError, TextBuffer, TextTarget};

pub use relay::{ContactRelay, Relay, RelayConfig, RelayError};

pub use sanitize::{html_to_plain_text, strip_html_tags};

pub use view::{DashboardView, FetchKey, Phase, ViewContainer, ViewState};
