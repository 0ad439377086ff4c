//! External model provider configuration.
//!
//! Two providers in fallback order. Bearer tokens are supplied out-of-band
//! through the environment variable each endpoint names — never through the
//! config file itself.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderEndpoint {
    pub name: String,
    /// Chat-completions style endpoint URL.
    pub endpoint: String,
    pub model: String,
    /// Name of the environment variable holding the bearer token.
    pub api_key_env: String,
}

impl ProviderEndpoint {
    /// Resolve the bearer token from the environment. `None` means the
    /// provider is absent for this process.
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    pub primary: Option<ProviderEndpoint>,
    pub fallback: Option<ProviderEndpoint>,
}

impl ProvidersConfig {
    /// The providers to try, in order.
    pub fn chain(&self) -> Vec<&ProviderEndpoint> {
        self.primary.iter().chain(self.fallback.iter()).collect()
    }
}
