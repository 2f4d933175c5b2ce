// cfban-api: Async client for the Cloudflare v4 endpoints behind the fail2ban action

pub mod client;
pub mod error;
pub mod models;
pub mod transport;

mod accounts;
mod filters;
mod firewall;
mod lists;

pub use client::{CloudflareClient, encode_body};
pub use error::Error;
pub use models::{ApiMessage, Outcome};
pub use transport::TransportConfig;

/// Re-exported so callers can name request methods without a direct
/// `reqwest` dependency.
pub use reqwest::Method;
