//! Logging setup for cs-common services.
//!
//! Library code logs through `tracing` macros. Binaries (Lambda handlers,
//! tools) call [`init`] once at startup to install a subscriber configured
//! from the environment.
//!
//! # Environment Variables
//!
//! - `CS_DEBUG=1` - Enable debug logging
//! - `CS_LOG_LEVEL=trace|debug|info|warn|error|off` - Set log level
//! - `CS_LOG_FORMAT=json|pretty|compact` - Set output format (default `json`)
//! - `CS_LOG_COLOR=1|0` - Enable/disable ANSI colors for non-JSON output
//! - `CS_LOG_NAME=...` - Logger name attached to the root span
//!
//! `RUST_LOG`, when set, takes precedence over the level settings.
//!
//! # Usage
//!
//! ```rust,no_run
//! let config = cs_log::LogConfig::from_env();
//! cs_log::try_init(&config).expect("subscriber already installed");
//!
//! let _guard = config.span().entered();
//! tracing::info!(port = 8080, "Handler ready");
//! ```

use once_cell::sync::OnceCell;
use std::env;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Default logger name.
pub const DEFAULT_NAME: &str = "cs-common";

static INSTALLED: OnceCell<LogConfig> = OnceCell::new();

/// Result type for logging setup.
pub type Result<T> = std::result::Result<T, LogError>;

/// Logging setup errors.
#[derive(Debug, Error)]
pub enum LogError {
    /// A global subscriber is already installed.
    #[error("Failed to install log subscriber: {0}")]
    Init(String),
}

// ============================================================================
// Log Levels
// ============================================================================

/// Minimum level that gets emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl Level {
    /// Parse a level name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "trace" => Some(Level::Trace),
            "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "off" | "none" => Some(Level::Off),
            _ => None,
        }
    }

    /// Directive understood by `EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            Level::Trace => "trace",
            Level::Debug => "debug",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Off => "off",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_directive())
    }
}

// ============================================================================
// Log Format
// ============================================================================

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Multi-line human readable output
    Pretty,
    /// Single-line human readable output
    Compact,
    /// One JSON object per line
    Json,
}

impl Format {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pretty" => Some(Format::Pretty),
            "compact" => Some(Format::Compact),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

// ============================================================================
// Configuration
// ============================================================================

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Whether debug mode is enabled
    pub debug: bool,
    /// Minimum log level
    pub level: Level,
    /// Output format
    pub format: Format,
    /// Whether colors are enabled
    pub color: bool,
    /// Logger name attached to the root span
    pub name: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            debug: false,
            level: Level::Info,
            format: Format::Json,
            color: false,
            name: DEFAULT_NAME.to_string(),
        }
    }
}

impl LogConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let flag = |key: &str| {
            lookup(key).map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        };

        let debug = flag("CS_DEBUG").unwrap_or(false);

        let level = lookup("CS_LOG_LEVEL")
            .and_then(|s| Level::parse(&s))
            .unwrap_or(if debug { Level::Debug } else { Level::Info });

        let format = lookup("CS_LOG_FORMAT")
            .and_then(|s| Format::parse(&s))
            .unwrap_or(Format::Json);

        let color = flag("CS_LOG_COLOR").unwrap_or(false);

        let name = lookup("CS_LOG_NAME")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_NAME.to_string());

        Self {
            debug,
            level,
            format,
            color,
            name,
        }
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Effective level once debug mode is taken into account.
    pub fn effective_level(&self) -> Level {
        if self.debug && self.level > Level::Debug {
            Level::Debug
        } else {
            self.level
        }
    }

    /// Root span carrying the logger name.
    pub fn span(&self) -> tracing::Span {
        tracing::info_span!("logger", name = %self.name)
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.effective_level().as_directive()))
    }
}

// ============================================================================
// Public API
// ============================================================================

/// Install a subscriber configured from the environment.
///
/// Does nothing if this crate already installed one. Panics if some other
/// code installed a global subscriber first; use [`try_init`] to handle that.
pub fn init() {
    if INSTALLED.get().is_some() {
        return;
    }
    if let Err(e) = try_init(&LogConfig::from_env()) {
        panic!("{}", e);
    }
}

/// Install a subscriber for `config`.
pub fn try_init(config: &LogConfig) -> Result<()> {
    let registry = tracing_subscriber::registry().with(config.filter());

    let installed = match config.format {
        Format::Json => registry
            .with(fmt::layer().json().flatten_event(true).with_current_span(true))
            .try_init(),
        Format::Pretty => registry
            .with(fmt::layer().pretty().with_ansi(config.color))
            .try_init(),
        Format::Compact => registry
            .with(fmt::layer().compact().with_ansi(config.color))
            .try_init(),
    };
    installed.map_err(|e| LogError::Init(e.to_string()))?;

    let _ = INSTALLED.set(config.clone());
    tracing::debug!(level = %config.effective_level(), format = ?config.format, "Logging initialized");
    Ok(())
}

/// Configuration of the subscriber installed by this crate, if any.
pub fn installed_config() -> Option<&'static LogConfig> {
    INSTALLED.get()
}

// ============================================================================
// Tests
// ============================================================================

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
    fn test_level_ordering() {
        assert!(Level::Trace < Level::Debug);
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Off);
    }

    #[test]
    fn test_level_parse() {
        assert_eq!(Level::parse("debug"), Some(Level::Debug));
        assert_eq!(Level::parse("DEBUG"), Some(Level::Debug));
        assert_eq!(Level::parse("warning"), Some(Level::Warn));
        assert_eq!(Level::parse("invalid"), None);
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(Format::parse("pretty"), Some(Format::Pretty));
        assert_eq!(Format::parse("compact"), Some(Format::Compact));
        assert_eq!(Format::parse("json"), Some(Format::Json));
        assert_eq!(Format::parse("xml"), None);
    }

    #[test]
    fn test_defaults() {
        let config = LogConfig::from_lookup(|_| None);
        assert_eq!(config, LogConfig::default());
        assert_eq!(config.name, "cs-common");
    }

    #[test]
    fn test_debug_flag_lowers_level() {
        let config = LogConfig::from_lookup(lookup(&[("CS_DEBUG", "true")]));
        assert!(config.debug);
        assert_eq!(config.level, Level::Debug);

        let config = LogConfig::from_lookup(lookup(&[("CS_DEBUG", "1"), ("CS_LOG_LEVEL", "error")]));
        assert_eq!(config.level, Level::Error);
        assert_eq!(config.effective_level(), Level::Debug);
    }

    #[test]
    fn test_from_lookup_reads_everything() {
        let config = LogConfig::from_lookup(lookup(&[
            ("CS_LOG_LEVEL", "warn"),
            ("CS_LOG_FORMAT", "compact"),
            ("CS_LOG_COLOR", "1"),
            ("CS_LOG_NAME", "landing"),
        ]));
        assert_eq!(config.level, Level::Warn);
        assert_eq!(config.format, Format::Compact);
        assert!(config.color);
        assert_eq!(config.name, "landing");
    }

    #[test]
    fn test_second_install_fails() {
        let config = LogConfig::default().level(Level::Off);
        let first = try_init(&config);
        let second = try_init(&config);
        // Another test binary may have installed one already; either way
        // the second attempt cannot succeed.
        assert!(first.is_ok() || second.is_err());
        assert!(second.is_err());
        if first.is_ok() {
            assert_eq!(installed_config(), Some(&config));
        }
    }
}
