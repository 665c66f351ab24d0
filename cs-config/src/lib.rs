//! Configuration for cs-common services.
//!
//! A [`Config`] holds settings shared by every landing page plus one
//! [`LandingConfig`] per landing (API credentials and enrollable programs).
//! It loads from a JSON or TOML file, or from the AWS parameter store with
//! the `ssm` feature, and is checked with the declarative field rules from
//! `cs-validation`.
//!
//! ```no_run
//! # async fn run() -> cs_config::Result<()> {
//! use cs_config::ConfigService;
//!
//! // CS_CONFIG_FILE=config/dev.json or CS_PARAMETER_PATH=/cs/dev/
//! let service = ConfigService::builder().load_dotenv(None).build().await?;
//! let landing = service.landing("sample");
//! # Ok(())
//! # }
//! ```

pub mod config_service;
pub mod env;
pub mod error;
pub mod loader;
pub mod model;
pub mod parameters;
mod validation;

pub use config_service::{ConfigService, ConfigServiceBuilder};
pub use env::{ConfigSource, load_dotenv};
pub use error::{ConfigError, Result};
pub use loader::{ConfigLoader, FileFormat, load_config_file};
pub use model::{CommonConfig, Config, LandingConfig, Program};
pub use parameters::{build_tree, config_from_parameters};

#[cfg(feature = "ssm")]
pub use parameters::ParameterStoreLoader;
