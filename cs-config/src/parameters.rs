//! Parameter store support.
//!
//! Parameters live under a path prefix, one value per leaf:
//!
//! ```text
//! /cs/dev/common/public_base_uri       = https://app.example.com/public
//! /cs/dev/landing/sample/client_id     = oauth.client.id
//! /cs/dev/landing/sample/programs      = [{"organization_name": "org", ...}]
//! ```
//!
//! [`build_tree`] turns such a flat listing into the nested document that
//! [`Config`] deserializes from. Fetching from AWS SSM requires the `ssm`
//! feature.

use crate::{Config, Result};
use serde_json::{Map, Value};
use tracing::{debug, warn};

/// Rebuild a nested document from `(name, value)` parameter pairs.
///
/// `prefix` is stripped from each name and the rest is split on `/`. Empty
/// segments are ignored. When a name is both a leaf and a branch, the branch
/// wins.
pub fn build_tree<I, K, V>(parameters: I, prefix: &str) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    let mut root = Map::new();

    'parameters: for (name, value) in parameters {
        let name = name.as_ref();
        let relative = name.strip_prefix(prefix).unwrap_or(name);
        let segments: Vec<&str> = relative.split('/').filter(|s| !s.is_empty()).collect();

        let Some((leaf, branches)) = segments.split_last() else {
            debug!(name, "Skipping parameter without a key");
            continue;
        };

        let mut node = &mut root;
        for segment in branches {
            let entry = node
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                warn!(name, segment, "Parameter shadows a leaf value, replacing it");
                *entry = Value::Object(Map::new());
            }
            node = match entry {
                Value::Object(child) => child,
                _ => continue 'parameters,
            };
        }

        if node.get(*leaf).is_some_and(Value::is_object) {
            warn!(name, "Parameter collides with a nested group, ignoring it");
            continue;
        }
        node.insert(leaf.to_string(), Value::String(value.into()));
    }

    Value::Object(root)
}

/// Build a [`Config`] from parameter pairs found under `prefix`.
pub fn config_from_parameters<I, K, V>(parameters: I, prefix: &str) -> Result<Config>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Into<String>,
{
    Config::from_value(build_tree(parameters, prefix))
}

#[cfg(feature = "ssm")]
pub use self::ssm::ParameterStoreLoader;

#[cfg(feature = "ssm")]
mod ssm {
    use super::config_from_parameters;
    use crate::{Config, ConfigError, Result};
    use tracing::info;

    /// Reads every parameter under a path from AWS SSM.
    pub struct ParameterStoreLoader {
        client: aws_sdk_ssm::Client,
        path: String,
    }

    impl ParameterStoreLoader {
        pub fn new(client: aws_sdk_ssm::Client, path: impl Into<String>) -> Self {
            Self {
                client,
                path: path.into(),
            }
        }

        /// Create a loader using the default AWS credential chain.
        pub async fn from_region(region: impl Into<String>, path: impl Into<String>) -> Self {
            let sdk_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
                .region(aws_config::Region::new(region.into()))
                .load()
                .await;
            Self::new(aws_sdk_ssm::Client::new(&sdk_config), path)
        }

        pub fn path(&self) -> &str {
            &self.path
        }

        /// Fetch all parameters, decrypted, following every page.
        pub async fn fetch(&self) -> Result<Vec<(String, String)>> {
            let mut pages = self
                .client
                .get_parameters_by_path()
                .path(&self.path)
                .recursive(true)
                .with_decryption(true)
                .into_paginator()
                .send();

            let mut parameters = Vec::new();
            while let Some(page) = pages.next().await {
                let page = page.map_err(|e| ConfigError::ParameterStore(e.to_string()))?;
                for parameter in page.parameters() {
                    if let (Some(name), Some(value)) = (parameter.name(), parameter.value()) {
                        parameters.push((name.to_string(), value.to_string()));
                    }
                }
            }
            Ok(parameters)
        }

        /// Fetch and decode the configuration.
        pub async fn load(&self) -> Result<Config> {
            let parameters = self.fetch().await?;
            info!(
                path = %self.path,
                parameters = parameters.len(),
                "Loaded configuration from parameter store"
            );
            config_from_parameters(parameters, &self.path)
        }
    }
}
