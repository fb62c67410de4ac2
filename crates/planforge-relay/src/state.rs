use std::sync::Arc;
use std::time::Duration;

use planforge_core::config::{ProviderConfig, ProvidersConfig, RelayConfig};
use planforge_providers::VendorClient;

/// Shared state for relay handlers.
#[derive(Clone, Debug)]
pub struct RelayState {
    pub client: VendorClient,
    /// Per-provider endpoint and model overrides from the config file.
    pub providers: Arc<ProvidersConfig>,
}

impl RelayState {
    pub fn new(relay: &RelayConfig, providers: ProvidersConfig) -> Self {
        Self {
            client: VendorClient::new(Duration::from_secs(relay.upstream_timeout_secs)),
            providers: Arc::new(providers),
        }
    }

    pub fn overrides(&self, provider: &str) -> Option<&ProviderConfig> {
        self.providers.get_by_name(provider)
    }
}
