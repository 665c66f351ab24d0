// Annotation parsing
//
// Grammar: `rule ("," rule)*`, `rule := name | name ":" param`.
// List parameters (`a|b|c`) are split later by the rule that owns them.

/// One rule named in a field annotation, in declaration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleInvocation {
    /// Rule name as written, trimmed.
    pub name: String,
    /// Everything after the first colon, trimmed. `None` when no colon.
    pub param: Option<String>,
}

impl RuleInvocation {
    /// Create an invocation
    pub fn new(name: impl Into<String>, param: Option<impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            param: param.map(Into::into),
        }
    }
}

/// Parse a field annotation into its rule invocations.
///
/// Empty tokens (`"required,,email,"`) are dropped. Only the first colon
/// separates name from parameter, so `values:a:b|c` keeps `a:b` intact.
pub fn parse_tag(tag: &str) -> Vec<RuleInvocation> {
    tag.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| match token.split_once(':') {
            Some((name, param)) => RuleInvocation {
                name: name.trim().to_string(),
                param: Some(param.trim().to_string()),
            },
            None => RuleInvocation {
                name: token.to_string(),
                param: None,
            },
        })
        .collect()
}

/// Split a `|`-delimited parameter into trimmed entries.
pub fn split_list(param: &str) -> Vec<String> {
    param.split('|').map(|v| v.trim().to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple() {
        let rules = parse_tag("required,email");
        assert_eq!(
            rules,
            vec![
                RuleInvocation::new("required", None::<String>),
                RuleInvocation::new("email", None::<String>),
            ]
        );
    }

    #[test]
    fn test_parse_trims_and_skips_empty_tokens() {
        let rules = parse_tag(" , required ,  min-length : 3 ,");
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].name, "required");
        assert_eq!(rules[1].name, "min-length");
        assert_eq!(rules[1].param.as_deref(), Some("3"));
    }

    #[test]
    fn test_parse_splits_on_first_colon_only() {
        let rules = parse_tag("values:12:00|13:30");
        assert_eq!(rules[0].name, "values");
        assert_eq!(rules[0].param.as_deref(), Some("12:00|13:30"));
    }

    #[test]
    fn test_parse_keeps_declaration_order() {
        let names: Vec<_> = parse_tag("email,max-length:255,required")
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["email", "max-length", "required"]);
    }

    #[test]
    fn test_empty_tag() {
        assert!(parse_tag("").is_empty());
        assert!(parse_tag("  ,  ").is_empty());
    }

    #[test]
    fn test_split_list_trims() {
        assert_eq!(split_list(" one | two|three "), ["one", "two", "three"]);
    }
}
