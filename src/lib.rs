//! # Marketing Cloud Engagement MCP bridge
//!
//! Exposes the vendor's REST and legacy SOAP APIs as a small set of MCP
//! tools: authenticate with OAuth2 client credentials, translate the tool
//! arguments into the equivalent HTTP or SOAP call, and hand back the
//! normalized response as text.
//!
//! Modules:
//! - `config` — environment-backed account settings
//! - `cache` — per-scope OAuth token cache
//! - `routing` — advisory REST/SOAP router for logical operations
//! - `soap` — envelope construction and response parsing
//! - `executor` — REST and SOAP request execution
//! - `docs` — static documentation bundle
//! - `server` — the MCP tool surface

pub mod cache;
pub mod config;
pub mod docs;
pub mod error;
pub mod executor;
pub mod helpers;
pub mod routing;
pub mod server;
pub mod soap;
pub mod tests;
pub mod utils;
