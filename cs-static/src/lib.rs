//! # cs-static
//!
//! Static asset responder for Lambda functions behind an Application Load
//! Balancer.
//!
//! Assets are read once at startup into a path-keyed table. `GET` requests
//! for a known path are answered from memory with a week-long immutable
//! cache policy; text types are sent as text and everything else base64
//! encoded. Other requests fall through to a [`RequestHandler`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cs_static::{StaticAssets, StaticRuntime};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cs_static::StaticError> {
//!     cs_static::init_tracing();
//!
//!     let assets = StaticAssets::load_directory_tree("/var/task/public", "/var/task/public", "index.html")?;
//!     StaticRuntime::new(assets).run().await
//! }
//! ```
//!
//! ## Deployment
//!
//! ```bash
//! cargo lambda build --release
//! cargo lambda deploy
//! ```

mod assets;
mod error;
mod request;
mod response;
mod runtime;

pub use assets::{Asset, CACHE_CONTROL, StaticAssets};
pub use error::{Result, StaticError};
pub use request::StaticRequest;
pub use response::{AlbResponse, StaticResponse};
pub use runtime::{NotFound, RequestHandler, StaticConfig, StaticRuntime};

pub use lambda_http;
pub use lambda_runtime;

/// Initialize JSON logging for CloudWatch.
///
/// Settings come from the `CS_*` environment variables with JSON output
/// forced. Does nothing if a subscriber is already installed.
pub fn init_tracing() {
    let config = cs_log::LogConfig::from_env().format(cs_log::Format::Json);
    if let Err(e) = cs_log::try_init(&config) {
        tracing::debug!(error = %e, "Tracing already initialized");
    }
}

/// Initialize JSON logging at a fixed level.
pub fn init_tracing_with_level(level: cs_log::Level) {
    let config = cs_log::LogConfig::from_env()
        .format(cs_log::Format::Json)
        .level(level);
    if let Err(e) = cs_log::try_init(&config) {
        tracing::debug!(error = %e, "Tracing already initialized");
    }
}
