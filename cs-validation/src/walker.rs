// Struct walker

use crate::schema::FieldDescriptor;
use crate::{ErrorSink, FieldValue, Result, RuleKind, RuleParam, RuleRegistry, Schema, Validate, ValidationError};
use tracing::{debug, warn};

/// Validate `value` against its type's schema with the built-in rules.
///
/// Shorthand for `Validator::default().validate_struct(value, sink)`.
pub fn validate_struct<T, S>(value: &T, sink: &mut S) -> Result<()>
where
    T: Validate,
    S: ErrorSink + ?Sized,
{
    Validator::default().validate_struct(value, sink)
}

/// Walks a record's field table and reports rule failures to a sink.
///
/// Every field is visited; failures never stop the walk. The only early
/// exit is a shape mismatch, which leaves the sink untouched.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'r> {
    registry: &'r RuleRegistry,
}

impl Default for Validator<'static> {
    fn default() -> Self {
        Self::new(RuleRegistry::builtin())
    }
}

impl<'r> Validator<'r> {
    /// Create a walker over the given registry
    pub fn new(registry: &'r RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &'r RuleRegistry {
        self.registry
    }

    /// Validate a record using the schema attached to its type.
    pub fn validate_struct<T, S>(&self, value: &T, sink: &mut S) -> Result<()>
    where
        T: Validate,
        S: ErrorSink + ?Sized,
    {
        self.validate_with(value, T::schema(), sink)
    }

    /// Validate a record against an explicit schema.
    pub fn validate_with<T, S>(&self, value: &T, schema: &Schema<T>, sink: &mut S) -> Result<()>
    where
        S: ErrorSink + ?Sized,
    {
        schema.check_shape(value)?;

        let count: usize = schema
            .fields()
            .iter()
            .filter(|field| !field.rules().is_empty())
            .map(|field| self.validate_field(field, field.value(value), sink))
            .sum();

        if count > 0 {
            debug!(errors = count, "Validation failed");
            Err(ValidationError::Failed { count })
        } else {
            Ok(())
        }
    }

    /// Evaluate one field, returning how many entries were appended.
    fn validate_field<T, S>(&self, field: &FieldDescriptor<T>, value: FieldValue<'_>, sink: &mut S) -> usize
    where
        S: ErrorSink + ?Sized,
    {
        // Only a bare `required` token switches the field to required.
        let required = field.rules().iter().position(|rule| {
            rule.param.is_none()
                && self
                    .registry
                    .lookup(&rule.name)
                    .is_some_and(|def| def.kind() == RuleKind::Required)
        });

        if let Some(index) = required
            && let Some(definition) = self.registry.lookup(&field.rules()[index].name)
            && !definition.kind().check(&value, &RuleParam::None)
        {
            sink.append_error_field(field.name(), &definition.message_for(&RuleParam::None));
            return 1;
        }

        let mut appended = 0;
        for (index, rule) in field.rules().iter().enumerate() {
            if Some(index) == required {
                continue;
            }

            let Some(definition) = self.registry.lookup(&rule.name) else {
                debug!(field = field.name(), rule = %rule.name, "Skipping unknown rule");
                continue;
            };

            let kind = definition.kind();
            if kind == RuleKind::Required {
                // Only the first bare required invocation is evaluated.
                continue;
            }

            let Some(param) = kind.resolve_param(rule.param.as_deref()) else {
                warn!(
                    field = field.name(),
                    rule = %rule.name,
                    param = ?rule.param,
                    "Skipping rule with missing parameter"
                );
                continue;
            };

            if !kind.check(&value, &param) {
                sink.append_error_field(&kind.error_key(field.name()), &definition.message_for(&param));
                appended += 1;
            }
        }
        appended
    }
}
