// Rule registry

use crate::tag::split_list;
use crate::validators::{IsEmail, MaxLength, MinLength, NotZero, OneOf, Required};
use crate::FieldValue;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use tracing::warn;

pub const REQUIRED_MESSAGE: &str = "This is a required field";
pub const EMAIL_MESSAGE: &str = "This is not a valid email address";
pub const TOO_SHORT_MESSAGE: &str = "This must be at least {} characters";
pub const TOO_LONG_MESSAGE: &str = "This must not be longer than {} characters";
pub const VALID_VALUE_MESSAGE: &str = "This must be one of the following values: {}";

static BUILTIN: Lazy<RuleRegistry> = Lazy::new(RuleRegistry::with_builtins);

/// The closed set of rule behaviours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RuleKind {
    Required,
    Email,
    MinLength,
    MaxLength,
    Values,
    ValuesInsensitive,
    NotZero,
}

impl RuleKind {
    /// Every built-in kind.
    pub const ALL: [RuleKind; 7] = [
        RuleKind::Required,
        RuleKind::Email,
        RuleKind::MinLength,
        RuleKind::MaxLength,
        RuleKind::Values,
        RuleKind::ValuesInsensitive,
        RuleKind::NotZero,
    ];

    /// Name used in annotations.
    pub fn name(&self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::Email => "email",
            RuleKind::MinLength => "min-length",
            RuleKind::MaxLength => "max-length",
            RuleKind::Values => "values",
            RuleKind::ValuesInsensitive => "values-insensitive",
            RuleKind::NotZero => "not-zero",
        }
    }

    /// Default message template. `{}` is replaced by the parameter.
    pub fn default_message(&self) -> &'static str {
        match self {
            RuleKind::Required | RuleKind::NotZero => REQUIRED_MESSAGE,
            RuleKind::Email => EMAIL_MESSAGE,
            RuleKind::MinLength => TOO_SHORT_MESSAGE,
            RuleKind::MaxLength => TOO_LONG_MESSAGE,
            RuleKind::Values | RuleKind::ValuesInsensitive => VALID_VALUE_MESSAGE,
        }
    }

    /// Turn the raw annotation parameter into a typed one.
    ///
    /// `None` means the rule needs a parameter and the annotation did not
    /// supply one. A length that is not a non-negative integer reads as 0.
    pub fn resolve_param(&self, raw: Option<&str>) -> Option<RuleParam> {
        match self {
            RuleKind::Required | RuleKind::Email | RuleKind::NotZero => Some(RuleParam::None),
            RuleKind::MinLength | RuleKind::MaxLength => {
                let raw = raw?;
                let length = raw.trim().parse::<usize>().unwrap_or_else(|_| {
                    warn!(rule = self.name(), param = raw, "Length parameter is not a number, using 0");
                    0
                });
                Some(RuleParam::Length(length))
            }
            RuleKind::Values | RuleKind::ValuesInsensitive => {
                raw.map(|list| RuleParam::AllowList(split_list(list)))
            }
        }
    }

    /// Pass condition.
    pub fn check(&self, value: &FieldValue<'_>, param: &RuleParam) -> bool {
        match (self, param) {
            (RuleKind::Required, _) => Required::check(value),
            (RuleKind::Email, _) => IsEmail::check(value),
            (RuleKind::NotZero, _) => NotZero::check(value),
            (RuleKind::MinLength, RuleParam::Length(n)) => MinLength(*n).check(value),
            (RuleKind::MaxLength, RuleParam::Length(n)) => MaxLength(*n).check(value),
            (RuleKind::Values, RuleParam::AllowList(allowed)) => OneOf {
                allowed,
                case_sensitive: true,
            }
            .check(value),
            (RuleKind::ValuesInsensitive, RuleParam::AllowList(allowed)) => OneOf {
                allowed,
                case_sensitive: false,
            }
            .check(value),
            // Parameter of the wrong shape: the rule cannot constrain anything.
            _ => true,
        }
    }

    /// Sink key for a failure on `field`.
    pub fn error_key(&self, field: &str) -> String {
        match self {
            RuleKind::MinLength => format!("{}_too_short", field),
            RuleKind::MaxLength => format!("{}_too_long", field),
            _ => field.to_string(),
        }
    }
}

/// Typed rule parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleParam {
    None,
    Length(usize),
    AllowList(Vec<String>),
}

impl RuleParam {
    fn render(&self) -> String {
        match self {
            RuleParam::None => String::new(),
            RuleParam::Length(n) => n.to_string(),
            RuleParam::AllowList(values) => values.join(", "),
        }
    }
}

/// A named rule: what it checks and what it says when the check fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDefinition {
    name: String,
    kind: RuleKind,
    message: String,
}

impl RuleDefinition {
    /// Built-in definition for a kind
    pub fn builtin(kind: RuleKind) -> Self {
        Self {
            name: kind.name().to_string(),
            kind,
            message: kind.default_message().to_string(),
        }
    }

    /// Register a kind under another name
    pub fn alias(name: impl Into<String>, kind: RuleKind) -> Self {
        Self {
            name: name.into(),
            kind,
            message: kind.default_message().to_string(),
        }
    }

    /// Replace the message template
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RuleKind {
        self.kind
    }

    /// Message with the parameter interpolated.
    pub fn message_for(&self, param: &RuleParam) -> String {
        if self.message.contains("{}") {
            self.message.replacen("{}", &param.render(), 1)
        } else {
            self.message.clone()
        }
    }
}

/// Immutable lookup table from rule name to definition.
///
/// Built once and shared read-only. [`RuleRegistry::builtin`] is the
/// process-wide default; tests and special callers can assemble their own.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, RuleDefinition>,
}

impl RuleRegistry {
    /// Registry with no rules
    pub fn empty() -> Self {
        Self::default()
    }

    /// Fresh registry holding every built-in rule
    pub fn with_builtins() -> Self {
        RuleKind::ALL
            .into_iter()
            .fold(Self::empty(), |registry, kind| {
                registry.register(RuleDefinition::builtin(kind))
            })
    }

    /// Shared built-in registry
    pub fn builtin() -> &'static RuleRegistry {
        &BUILTIN
    }

    /// Add or replace a definition
    pub fn register(mut self, definition: RuleDefinition) -> Self {
        self.rules.insert(definition.name.clone(), definition);
        self
    }

    /// Drop a definition
    pub fn without(mut self, name: &str) -> Self {
        self.rules.remove(name);
        self
    }

    /// Look up a rule by annotation name
    pub fn lookup(&self, name: &str) -> Option<&RuleDefinition> {
        self.rules.get(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_lookup() {
        let registry = RuleRegistry::builtin();
        assert_eq!(registry.len(), 7);
        for kind in RuleKind::ALL {
            assert_eq!(registry.lookup(kind.name()).map(|d| d.kind()), Some(kind));
        }
        assert!(registry.lookup("bogus-rule").is_none());
    }

    #[test]
    fn test_names_are_sorted() {
        assert_eq!(
            RuleRegistry::builtin().names(),
            vec![
                "email",
                "max-length",
                "min-length",
                "not-zero",
                "required",
                "values",
                "values-insensitive",
            ]
        );
        assert!(RuleRegistry::empty().names().is_empty());
    }

    #[test]
    fn test_reduced_registry() {
        let registry = RuleRegistry::with_builtins().without("email");
        assert!(registry.lookup("email").is_none());
        assert_eq!(registry.len(), 6);
    }

    #[test]
    fn test_resolve_length_param() {
        assert_eq!(
            RuleKind::MinLength.resolve_param(Some("3")),
            Some(RuleParam::Length(3))
        );
        assert_eq!(RuleKind::MaxLength.resolve_param(None), None);
    }

    #[test]
    fn test_unparseable_length_reads_as_zero() {
        assert_eq!(
            RuleKind::MinLength.resolve_param(Some("three")),
            Some(RuleParam::Length(0))
        );
        assert_eq!(
            RuleKind::MaxLength.resolve_param(Some("-4")),
            Some(RuleParam::Length(0))
        );
        assert_eq!(RuleKind::MaxLength.resolve_param(Some("")), Some(RuleParam::Length(0)));
    }

    #[test]
    fn test_resolve_list_param() {
        assert_eq!(
            RuleKind::Values.resolve_param(Some("one | two|three")),
            Some(RuleParam::AllowList(vec![
                "one".into(),
                "two".into(),
                "three".into()
            ]))
        );
        assert_eq!(RuleKind::ValuesInsensitive.resolve_param(None), None);
        assert_eq!(RuleKind::Email.resolve_param(Some("ignored")), Some(RuleParam::None));
    }

    #[test]
    fn test_messages() {
        let short = RuleDefinition::builtin(RuleKind::MinLength);
        assert_eq!(
            short.message_for(&RuleParam::Length(3)),
            "This must be at least 3 characters"
        );

        let long = RuleDefinition::builtin(RuleKind::MaxLength);
        assert_eq!(
            long.message_for(&RuleParam::Length(30)),
            "This must not be longer than 30 characters"
        );

        let values = RuleDefinition::builtin(RuleKind::Values);
        let list = RuleParam::AllowList(vec!["one".into(), "two".into(), "three".into()]);
        assert_eq!(
            values.message_for(&list),
            "This must be one of the following values: one, two, three"
        );

        let not_zero = RuleDefinition::builtin(RuleKind::NotZero);
        assert_eq!(not_zero.message_for(&RuleParam::None), REQUIRED_MESSAGE);
    }

    #[test]
    fn test_error_keys() {
        assert_eq!(RuleKind::MinLength.error_key("name"), "name_too_short");
        assert_eq!(RuleKind::MaxLength.error_key("name"), "name_too_long");
        assert_eq!(RuleKind::Email.error_key("name"), "name");
    }

    #[test]
    fn test_alias_with_message() {
        let registry = RuleRegistry::empty().register(
            RuleDefinition::alias("mandatory", RuleKind::Required).with_message("Needed"),
        );
        let def = registry.lookup("mandatory").unwrap();
        assert_eq!(def.kind(), RuleKind::Required);
        assert_eq!(def.message_for(&RuleParam::None), "Needed");
    }
}
