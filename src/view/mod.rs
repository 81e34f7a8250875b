//! View State
//!
//! The fetch/track/render layer of the dashboard. Each data need owns a
//! [`ViewContainer`] holding a [`ViewState`] (`{data, loading, error}`),
//! populated by a single fetch started when the view mounts.
//!
//! ## Lifecycle
//!
//! 1. `ViewContainer::new` starts in the loading state with default data
//! 2. `mount` spawns the fetch once; later calls do nothing
//! 3. The fetch resolves the state to success or error, never both
//! 4. `teardown` aborts a fetch still in flight so its result is dropped
//!
//! There is no retry, cache or deduplication: a failed view stays failed
//! until a new container is mounted.

mod container;
mod dashboard;
mod state;

pub use container::{FetchKey, ViewContainer};
pub use dashboard::{DashboardSnapshot, DashboardView, ORDERS_ERROR, STATS_ERROR, SUMMARY_ERROR};
pub use state::{Phase, ViewState};
