// cs-common - shared building blocks for care-services Lambdas
//
// The validation engine is always available; the rest is behind features
// that are all enabled by default.

// Re-export the validation engine
pub use cs_validation::*;

// Re-export optional crates
#[cfg(feature = "log")]
pub use cs_log;

#[cfg(feature = "config")]
pub use cs_config;

#[cfg(feature = "client")]
pub use cs_client;

#[cfg(feature = "static")]
pub use cs_static;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        AsFieldValue, ErrorMap, ErrorSink, FieldValue, RuleRegistry, Schema, Validate,
        ValidationError, Validator, validate_struct,
    };

    #[cfg(feature = "config")]
    pub use cs_config::{Config, ConfigService, ConfigSource, LandingConfig, Program};

    #[cfg(feature = "client")]
    pub use cs_client::{ApiClient, ClientConfig, ClientError, Profile, RequestContext};

    #[cfg(feature = "static")]
    pub use cs_static::{StaticAssets, StaticRuntime};
}
