//! Async client for the tidyDNS administrative HTTP API.
//!
//! [`TidyDnsClient`] maps each operation of the service (zones, DNS
//! records, DHCP subnets and interfaces, internal users) onto one or two
//! authenticated HTTP round trips and normalizes the service's loosely
//! typed JSON into the types in [`types`].

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;
pub mod types;
mod wire;

pub use api::TidyDnsApi;
pub use client::TidyDnsClient;
pub use config::ClientConfig;
pub use error::{Conflict, Error, Result};
pub use transport::{HttpTransport, Transport};
pub use types::*;

pub use tokio_util::sync::CancellationToken;
