//! Contact Relay
//!
//! Forwards validated issue reports to the upstream contact service, which
//! owns delivery (email, ticketing). Tally only hands the payload over.
//!
//! The [`Relay`] trait is the seam the API depends on; [`ContactRelay`] is
//! the HTTP implementation.

mod client;

pub use client::{ContactRelay, Relay, RelayConfig, RelayError};
