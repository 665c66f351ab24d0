// ConfigService - shared handle to the current configuration

use crate::{Config, ConfigSource, LandingConfig, Program, Result, load_dotenv};
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::info;

/// Shared handle to the current configuration.
///
/// Clones share the same slot, so a [`replace`](Self::replace) is visible to
/// every holder. Readers get an `Arc` snapshot that stays valid across
/// replacements.
#[derive(Debug, Clone)]
pub struct ConfigService {
    current: Arc<RwLock<Arc<Config>>>,
}

impl ConfigService {
    pub fn new(config: Config) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(config))),
        }
    }

    /// Builder for creating configured service
    pub fn builder() -> ConfigServiceBuilder {
        ConfigServiceBuilder::new()
    }

    /// Snapshot of the current configuration
    pub fn current(&self) -> Arc<Config> {
        self.current.read().clone()
    }

    /// Swap in a new configuration, returning the previous one.
    pub fn replace(&self, config: Config) -> Arc<Config> {
        let mut slot = self.current.write();
        std::mem::replace(&mut *slot, Arc::new(config))
    }

    pub fn landing(&self, name: &str) -> Option<LandingConfig> {
        self.current().landing(name).cloned()
    }

    pub fn program(&self, landing: &str, program: &str) -> Option<Program> {
        self.current().program(landing, program).cloned()
    }

    pub fn public_base_uri(&self) -> String {
        self.current().common.public_base_uri.clone()
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl From<Config> for ConfigService {
    fn from(config: Config) -> Self {
        Self::new(config)
    }
}

/// Builder for ConfigService
pub struct ConfigServiceBuilder {
    source: Option<ConfigSource>,
    load_dotenv: bool,
    dotenv_path: Option<String>,
    validate: bool,
}

impl ConfigServiceBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            load_dotenv: false,
            dotenv_path: None,
            validate: true,
        }
    }

    /// Use an explicit source instead of reading the environment
    pub fn source(mut self, source: ConfigSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Enable loading from .env file before the environment is read
    pub fn load_dotenv(mut self, path: Option<String>) -> Self {
        self.load_dotenv = true;
        self.dotenv_path = path;
        self
    }

    /// Skip validation of the loaded configuration
    pub fn skip_validation(mut self) -> Self {
        self.validate = false;
        self
    }

    /// Load, validate and wrap the configuration
    pub async fn build(self) -> Result<ConfigService> {
        if self.load_dotenv {
            load_dotenv(self.dotenv_path.as_deref())?;
        }

        let source = match self.source {
            Some(source) => source,
            None => ConfigSource::from_env()?,
        };

        let config = source.load().await?;
        if self.validate {
            config.validate()?;
        }

        info!(source = ?source, landings = config.landing.len(), "Configuration ready");
        Ok(ConfigService::new(config))
    }
}

impl Default for ConfigServiceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replace_is_shared_between_clones() {
        let service = ConfigService::default();
        let other = service.clone();
        let before = service.current();

        let mut next = Config::default();
        next.common.public_base_uri = "https://new.example.com".into();
        let previous = other.replace(next);

        assert_eq!(previous, before);
        assert_eq!(service.public_base_uri(), "https://new.example.com");
        assert_eq!(before.common.public_base_uri, "");
    }

    #[test]
    fn test_missing_landing() {
        let service = ConfigService::from(Config::default());
        assert!(service.landing("none").is_none());
        assert!(service.program("none", "none").is_none());
    }
}
