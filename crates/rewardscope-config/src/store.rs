//! Remote key-value store configuration

use serde::{Deserialize, Serialize};

/// Key-value store configuration
///
/// Account, namespace and credentials have no defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// API base, e.g. `https://api.cloudflare.com/client/v4`
    pub api_base: String,

    pub account_id: Option<String>,

    pub namespace_id: Option<String>,

    /// Sent as `X-Auth-Email`
    pub auth_email: Option<String>,

    /// Sent as `X-Auth-Key`
    pub auth_key: Option<String>,

    /// Key the snapshot is written under
    pub key: String,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.cloudflare.com/client/v4".to_string(),
            account_id: None,
            namespace_id: None,
            auth_email: None,
            auth_key: None,
            key: "trend".to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl StoreConfig {
    /// Names of required fields that are unset or blank
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("store.account_id", &self.account_id),
            ("store.namespace_id", &self.namespace_id),
            ("store.auth_email", &self.auth_email),
            ("store.auth_key", &self.auth_key),
        ]
        .into_iter()
        .filter(|(_, value)| value.as_deref().map_or(true, |v| v.trim().is_empty()))
        .map(|(name, _)| name)
        .collect()
    }
}
