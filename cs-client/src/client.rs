//! API client implementation.

use http::Method;
use std::sync::Arc;

use crate::{ClientConfig, RequestBuilder, Result};

/// Client for the user profile and care team API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    inner: reqwest::Client,
    config: Arc<ClientConfig>,
    base_uri: Arc<str>,
}

impl ApiClient {
    /// Create a client for the API rooted at `base_uri`.
    pub fn new(config: ClientConfig, base_uri: impl AsRef<str>) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_idle_timeout(config.pool.idle_timeout)
            .pool_max_idle_per_host(config.effective_max_idle())
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self {
            inner,
            config: Arc::new(config),
            base_uri: Arc::from(base_uri.as_ref().trim_end_matches('/')),
        })
    }

    /// Create a client for the public API named in the loaded configuration.
    pub fn from_config(config: ClientConfig, app: &cs_config::Config) -> Result<Self> {
        Self::new(config, &app.common.public_base_uri)
    }

    /// Get the underlying reqwest client.
    pub fn inner(&self) -> &reqwest::Client {
        &self.inner
    }

    /// Get the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_uri, path)
    }

    /// Create a GET request builder.
    pub fn get(&self, path: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::GET, path.into())
    }

    /// Create a POST request builder.
    pub fn post(&self, path: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, Method::POST, path.into())
    }

    /// Create a request builder with a custom method.
    pub fn request(&self, method: Method, path: impl Into<String>) -> RequestBuilder<'_> {
        RequestBuilder::new(self, method, path.into())
    }
}
