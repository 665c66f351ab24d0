// Environment-driven source selection

use crate::{Config, ConfigError, Result};
use std::env;
use std::path::PathBuf;
use tracing::debug;

/// Environment variable naming a JSON or TOML configuration file.
pub const CONFIG_FILE_VAR: &str = "CS_CONFIG_FILE";
/// Environment variable naming a parameter store path.
pub const PARAMETER_PATH_VAR: &str = "CS_PARAMETER_PATH";
/// Environment variable naming the AWS region.
pub const REGION_VAR: &str = "AWS_REGION";

const DEFAULT_REGION: &str = "us-east-1";

/// Where the configuration comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// A local JSON or TOML file
    File(PathBuf),
    /// Every parameter under `path` in the given region
    ParameterStore { region: String, path: String },
}

impl ConfigSource {
    /// Select the source from the process environment.
    ///
    /// A file takes precedence over the parameter store.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Select the source through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(path) = non_empty(CONFIG_FILE_VAR) {
            return Ok(ConfigSource::File(PathBuf::from(path)));
        }

        if let Some(path) = non_empty(PARAMETER_PATH_VAR) {
            let region = non_empty(REGION_VAR).unwrap_or_else(|| DEFAULT_REGION.to_string());
            return Ok(ConfigSource::ParameterStore { region, path });
        }

        Err(ConfigError::NoSource)
    }

    /// Load the configuration from this source.
    pub async fn load(&self) -> Result<Config> {
        match self {
            ConfigSource::File(path) => crate::load_config_file(path),
            #[cfg(feature = "ssm")]
            ConfigSource::ParameterStore { region, path } => {
                crate::ParameterStoreLoader::from_region(region.as_str(), path.as_str())
                    .await
                    .load()
                    .await
            }
            #[cfg(not(feature = "ssm"))]
            ConfigSource::ParameterStore { .. } => Err(ConfigError::SsmDisabled),
        }
    }
}

/// Load a `.env` file into the process environment.
///
/// With no path, `.env` is searched for from the current directory upwards.
/// A missing file is not an error.
pub fn load_dotenv(path: Option<&str>) -> Result<()> {
    let outcome = match path {
        Some(p) => dotenvy::from_path(p).map(|_| ()),
        None => dotenvy::dotenv().map(|_| ()),
    };

    match outcome {
        Ok(()) => Ok(()),
        Err(e) if e.not_found() => {
            debug!("No .env file found");
            Ok(())
        }
        Err(e) => Err(ConfigError::LoadError(format!("Failed to load .env: {}", e))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_file_source() {
        let source = ConfigSource::from_lookup(lookup(&[("CS_CONFIG_FILE", "conf/app.json")])).unwrap();
        assert_eq!(source, ConfigSource::File(PathBuf::from("conf/app.json")));
    }

    #[test]
    fn test_file_wins_over_parameter_store() {
        let source = ConfigSource::from_lookup(lookup(&[
            ("CS_CONFIG_FILE", "app.toml"),
            ("CS_PARAMETER_PATH", "/cs/dev/"),
        ]))
        .unwrap();
        assert!(matches!(source, ConfigSource::File(_)));
    }

    #[test]
    fn test_parameter_store_source() {
        let source = ConfigSource::from_lookup(lookup(&[
            ("CS_PARAMETER_PATH", "/cs/dev/"),
            ("AWS_REGION", "eu-west-1"),
        ]))
        .unwrap();
        assert_eq!(
            source,
            ConfigSource::ParameterStore {
                region: "eu-west-1".into(),
                path: "/cs/dev/".into()
            }
        );

        let source = ConfigSource::from_lookup(lookup(&[("CS_PARAMETER_PATH", "/cs/dev/")])).unwrap();
        assert!(matches!(source, ConfigSource::ParameterStore { region, .. } if region == "us-east-1"));
    }

    #[test]
    fn test_no_source() {
        let err = ConfigSource::from_lookup(lookup(&[("CS_CONFIG_FILE", "  ")])).unwrap_err();
        assert!(matches!(err, ConfigError::NoSource));
    }

    #[test]
    fn test_missing_dotenv_is_ignored() {
        assert!(load_dotenv(Some("/definitely/not/here/.env")).is_ok());
    }
}
