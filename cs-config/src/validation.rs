// Configuration validation

use crate::{Config, ConfigError, Result};
use cs_validation::{ErrorMap, ErrorSink, Validate, Validator};
use tracing::warn;

/// Sink adapter that qualifies every key with a dotted prefix.
struct Prefixed<'a, S: ?Sized> {
    prefix: String,
    inner: &'a mut S,
}

impl<'a, S: ErrorSink + ?Sized> Prefixed<'a, S> {
    fn new(prefix: impl Into<String>, inner: &'a mut S) -> Self {
        Self {
            prefix: prefix.into(),
            inner,
        }
    }
}

impl<S: ErrorSink + ?Sized> ErrorSink for Prefixed<'_, S> {
    fn append_error_field(&mut self, name: &str, message: &str) {
        let key = format!("{}.{}", self.prefix, name);
        self.inner.append_error_field(&key, message);
    }
}

impl Config {
    /// Check the loaded configuration with the field rules declared on each
    /// section.
    ///
    /// Keys in the returned map are dotted paths such as
    /// `landing.sample.client_id` or `landing.sample.programs.main.user_type_id`.
    pub fn validate(&self) -> Result<()> {
        let errors = self.collect_errors();
        if errors.is_empty() {
            return Ok(());
        }
        warn!(errors = errors.len(), "Configuration failed validation");
        Err(ConfigError::Invalid(errors))
    }

    fn collect_errors(&self) -> ErrorMap {
        let validator = Validator::default();
        let mut errors = ErrorMap::new();

        check(&validator, &self.common, "common", &mut errors);

        let mut landings: Vec<_> = self.landing.iter().collect();
        landings.sort_by(|a, b| a.0.cmp(b.0));
        for (name, landing) in landings {
            check(&validator, landing, &format!("landing.{name}"), &mut errors);

            let mut programs: Vec<_> = landing.program_map.iter().collect();
            programs.sort_by(|a, b| a.0.cmp(b.0));
            for (key, program) in programs {
                check(
                    &validator,
                    program,
                    &format!("landing.{name}.programs.{key}"),
                    &mut errors,
                );
            }
        }

        errors
    }
}

fn check<T: Validate>(validator: &Validator<'_>, value: &T, prefix: &str, errors: &mut ErrorMap) {
    // Failures are already in the sink; the count is not needed.
    let _ = validator.validate_struct(value, &mut Prefixed::new(prefix, errors));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LandingConfig, Program};

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.common.public_base_uri = "https://example.com/public".into();

        let mut landing = LandingConfig {
            client_id: "client".into(),
            username: "user".into(),
            password: "secret".into(),
            ..Default::default()
        };
        landing.program_map.insert(
            "main".into(),
            Program {
                organization_name: "org".into(),
                organization_id: 10,
                user_type_id: 20,
                ..Default::default()
            },
        );
        config.landing.insert("sample".into(), landing);
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(valid_config().validate().is_ok());
    }

    #[test]
    fn test_missing_fields_are_reported_with_paths() {
        let mut config = valid_config();
        config.common.public_base_uri = "  ".into();
        if let Some(landing) = config.landing.get_mut("sample") {
            landing.password.clear();
            if let Some(program) = landing.program_map.get_mut("main") {
                program.user_type_id = 0;
            }
        }

        let Err(ConfigError::Invalid(errors)) = config.validate() else {
            panic!("expected validation failure");
        };
        assert_eq!(errors.len(), 3);
        assert_eq!(errors.get("common.public_base_uri"), Some("This is a required field"));
        assert_eq!(errors.get("landing.sample.password"), Some("This is a required field"));
        assert_eq!(
            errors.get("landing.sample.programs.main.user_type_id"),
            Some("This is a required field")
        );
    }

    #[test]
    fn test_empty_config_only_needs_base_uri() {
        let errors = Config::default().collect_errors();
        assert_eq!(errors.len(), 1);
        assert!(errors.contains("common.public_base_uri"));
    }
}
