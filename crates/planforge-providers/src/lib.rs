//! LLM vendor layer for Planforge.
//!
//! # Architecture
//!
//! - [`registry`] — the static dispatch table: provider name → endpoint, auth shape, body style
//! - [`adapter::ProviderAdapter`] — per-vendor `{build_request, parse_response, authenticate}`
//! - [`http_provider::VendorClient`] — calls a vendor endpoint directly
//! - [`relay_client::RelayClient`] — calls a vendor through a running Planforge relay
//! - [`traits::CompletionBackend`] — what the planner talks to; both clients implement it

pub mod adapter;
pub mod error;
pub mod http_provider;
pub mod registry;
pub mod relay_client;
pub mod traits;

// Re-export main types for convenience
pub use adapter::{adapter_for, ProviderAdapter};
pub use error::ProviderError;
pub use http_provider::{VendorClient, VendorReply};
pub use registry::{AdapterKind, ProviderSpec, Route, PROVIDERS};
pub use relay_client::RelayClient;
pub use traits::{CompletionBackend, CompletionRequest, RequestParams};
