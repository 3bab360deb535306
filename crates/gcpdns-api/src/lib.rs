// gcpdns-api: Async Rust client for the Google Cloud DNS v1 REST API.

pub mod auth;
pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use auth::{ServiceAccountKey, TokenProvider};
pub use client::DnsClient;
pub use error::Error;
pub use transport::TransportConfig;
