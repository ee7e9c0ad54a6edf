//! Remote key-value store client
//!
//! Cloudflare Workers KV style write endpoint:
//!
//! ```text
//! PUT {api_base}/accounts/{account}/storage/kv/namespaces/{namespace}/values/{key}
//! X-Auth-Email: ...
//! X-Auth-Key: ...
//! Content-Type: application/json
//! ```
//!
//! Every write replaces the previous value. The response is logged and
//! returned, never retried.

use reqwest::Client;
use rewardscope_config::StoreConfig;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Debug, Error)]
pub enum StoreError {
    /// The request could not be completed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to serialize value: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Missing store configuration: {fields}")]
    MissingCredential { fields: String },
}

/// Account, namespace and auth headers
#[derive(Clone)]
pub struct KvCredentials {
    pub account_id: String,
    pub namespace_id: String,
    pub auth_email: String,
    pub auth_key: String,
}

impl std::fmt::Debug for KvCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvCredentials")
            .field("account_id", &self.account_id)
            .field("namespace_id", &self.namespace_id)
            .field("auth_email", &self.auth_email)
            .field("auth_key", &"<redacted>")
            .finish()
    }
}

impl KvCredentials {
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        let missing = config.missing_fields();
        if !missing.is_empty() {
            return Err(StoreError::MissingCredential {
                fields: missing.join(", "),
            });
        }

        let field = |value: &Option<String>| value.clone().unwrap_or_default();
        Ok(Self {
            account_id: field(&config.account_id),
            namespace_id: field(&config.namespace_id),
            auth_email: field(&config.auth_email),
            auth_key: field(&config.auth_key),
        })
    }
}

/// Raw store reply
#[derive(Debug, Clone, PartialEq)]
pub struct StoreResponse {
    pub status: u16,
    pub body: String,
}

impl StoreResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

pub struct KvStoreClient {
    client: Client,
    api_base: String,
    credentials: KvCredentials,
}

impl KvStoreClient {
    pub fn new(client: Client, api_base: &str, credentials: KvCredentials) -> Self {
        Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        Ok(Self::new(
            crate::http_client(config.request_timeout_secs),
            &config.api_base,
            KvCredentials::from_config(config)?,
        ))
    }

    pub fn value_url(&self, key: &str) -> String {
        format!(
            "{}/accounts/{}/storage/kv/namespaces/{}/values/{}",
            self.api_base, self.credentials.account_id, self.credentials.namespace_id, key
        )
    }

    /// Write `value` as JSON under `key`
    ///
    /// # Errors
    ///
    /// Serialization and transport failures. A non-success status is not an
    /// error; it is logged and returned in [`StoreResponse`].
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<StoreResponse, StoreError> {
        let body = serde_json::to_vec(value)?;
        let url = self.value_url(key);

        info!(
            event_type = "store_put_start",
            key = key,
            bytes = body.len(),
            "Writing value to key-value store"
        );

        let response = self
            .client
            .put(&url)
            .header("X-Auth-Email", &self.credentials.auth_email)
            .header("X-Auth-Key", &self.credentials.auth_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let reply = StoreResponse { status, body };

        if reply.is_success() {
            info!(
                event_type = "store_put_complete",
                key = key,
                http_status = status,
                response = %reply.body,
                "Key-value store update result"
            );
        } else {
            warn!(
                event_type = "store_put_rejected",
                key = key,
                http_status = status,
                response = %reply.body,
                "Key-value store rejected the update"
            );
        }

        Ok(reply)
    }
}
