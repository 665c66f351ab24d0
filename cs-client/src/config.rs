//! API client configuration.

use std::time::Duration;

/// Idle connection pooling, only in effect with keep-alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolSettings {
    pub max_idle_per_host: usize,
    pub idle_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_idle_per_host: 10,
            idle_timeout: Duration::from_secs(90),
        }
    }
}

/// Settings for an [`ApiClient`](crate::ApiClient).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Deadline for a whole request, body included.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub pool: PoolSettings,
    /// Reuse connections between requests.
    ///
    /// Off by default: every request asks the server to close the
    /// connection and nothing is kept in the pool.
    pub keep_alive: bool,
    /// Headers added to every request.
    pub default_headers: Vec<(String, String)>,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool: PoolSettings::default(),
            keep_alive: false,
            default_headers: Vec::new(),
            user_agent: format!("cs-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Idle connections the pool may actually hold.
    pub(crate) fn effective_max_idle(&self) -> usize {
        if self.keep_alive { self.pool.max_idle_per_host } else { 0 }
    }
}

/// Fluent construction of a [`ClientConfig`].
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    inner: ClientConfig,
}

impl ClientConfigBuilder {
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.inner.timeout = timeout;
        self
    }

    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.inner.connect_timeout = timeout;
        self
    }

    /// Turn on keep-alive with the given pool limits.
    pub fn keep_alive(mut self, pool: PoolSettings) -> Self {
        self.inner.keep_alive = true;
        self.inner.pool = pool;
        self
    }

    pub fn default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.inner.default_headers.push((name.into(), value.into()));
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.inner.user_agent = user_agent.into();
        self
    }

    pub fn build(self) -> ClientConfig {
        self.inner
    }
}
