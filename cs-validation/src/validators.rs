// Built-in pass conditions

use crate::FieldValue;
use chrono::{DateTime, NaiveDate, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

/// Zero instant for timestamps: 0001-01-01T00:00:00Z.
pub static ZERO_TIME: Lazy<DateTime<Utc>> = Lazy::new(|| {
    NaiveDate::from_ymd_opt(1, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc())
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
});

// Exactly one `@`, a dot somewhere after it, nothing blank on either side.
static EMAIL_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^@\s]+)@([^@\s]+)\.([^@\s]+)$").unwrap());

/// Value is present, and non-blank when it is text.
pub struct Required;

impl Required {
    pub fn check(value: &FieldValue<'_>) -> bool {
        match value {
            FieldValue::Absent => false,
            FieldValue::Text(s) => !s.trim().is_empty(),
            _ => true,
        }
    }
}

/// Loose email shape check. Blank values pass.
pub struct IsEmail;

impl IsEmail {
    pub fn check(value: &FieldValue<'_>) -> bool {
        let text = value.as_text();
        if text.trim().is_empty() {
            return true;
        }
        EMAIL_REGEX.is_match(&text)
    }
}

/// Trimmed length of at least `n` characters. Blank values pass.
pub struct MinLength(pub usize);

impl MinLength {
    pub fn check(&self, value: &FieldValue<'_>) -> bool {
        let text = value.as_text();
        let trimmed = text.trim();
        trimmed.is_empty() || trimmed.chars().count() >= self.0
    }
}

/// Trimmed length of at most `n` characters. Blank values pass.
pub struct MaxLength(pub usize);

impl MaxLength {
    pub fn check(&self, value: &FieldValue<'_>) -> bool {
        let text = value.as_text();
        let trimmed = text.trim();
        trimmed.is_empty() || trimmed.chars().count() <= self.0
    }
}

/// Membership in an allow-list. Blank values pass.
pub struct OneOf<'a> {
    pub allowed: &'a [String],
    pub case_sensitive: bool,
}

impl OneOf<'_> {
    pub fn check(&self, value: &FieldValue<'_>) -> bool {
        let text = value.as_text();
        let candidate = text.trim();
        if candidate.is_empty() {
            return true;
        }
        if self.case_sensitive {
            self.allowed.iter().any(|a| a == candidate)
        } else {
            let candidate = candidate.to_lowercase();
            self.allowed.iter().any(|a| a.to_lowercase() == candidate)
        }
    }
}

/// Present and not the zero value of its type.
pub struct NotZero;

impl NotZero {
    pub fn check(value: &FieldValue<'_>) -> bool {
        match value {
            FieldValue::Absent => false,
            FieldValue::Int(n) => *n != 0,
            FieldValue::UInt(n) => *n != 0,
            // Bit comparison: -0.0 is not the zero value.
            FieldValue::Float(f) => f.to_bits() != 0,
            FieldValue::Timestamp(t) => *t != *ZERO_TIME,
            FieldValue::Text(_) | FieldValue::Bool(_) | FieldValue::Opaque => true,
        }
    }
}
