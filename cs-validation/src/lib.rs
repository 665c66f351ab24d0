//! Declarative field validation for flat records.
//!
//! Each validated type declares a [`Schema`]: one entry per field with its
//! semantic name, an accessor, and an annotation such as
//! `"required,max-length:255"`. A [`Validator`] walks the schema, evaluates
//! every rule through a [`RuleRegistry`], and appends failures to a
//! caller-supplied [`ErrorSink`].
//!
//! # Annotations
//!
//! `rule ("," rule)*` where `rule` is `name` or `name:param`. Built-in rules:
//!
//! | rule | parameter | passes when |
//! |---|---|---|
//! | `required` | | present, and non-blank if text |
//! | `email` | | blank, or looks like `local@domain.tld` |
//! | `min-length` | `N` | blank, or trimmed length >= N |
//! | `max-length` | `N` | blank, or trimmed length <= N |
//! | `values` | `a\|b\|c` | blank, or exactly one of the values |
//! | `values-insensitive` | `a\|b\|c` | blank, or one of the values ignoring case |
//! | `not-zero` | | present and not zero |
//!
//! A failing `required` hides every other failure on the same field. Unknown
//! rule names are ignored.
//!
//! # Example
//!
//! ```
//! use cs_validation::{AsFieldValue, ErrorMap, Schema, Validate, validate_struct};
//! use once_cell::sync::Lazy;
//!
//! struct Signup {
//!     username: String,
//!     email: Option<String>,
//! }
//!
//! impl Validate for Signup {
//!     fn schema() -> &'static Schema<Self> {
//!         static SCHEMA: Lazy<Schema<Signup>> = Lazy::new(|| {
//!             Schema::builder()
//!                 .field("username", "required,min-length:3", |s: &Signup| s.username.as_field_value())
//!                 .field("email", "required,email", |s: &Signup| s.email.as_field_value())
//!                 .build()
//!         });
//!         &SCHEMA
//!     }
//! }
//!
//! let signup = Signup { username: "jd".into(), email: None };
//! let mut errors = ErrorMap::new();
//! assert!(validate_struct(&signup, &mut errors).is_err());
//! assert_eq!(errors.get("username_too_short"), Some("This must be at least 3 characters"));
//! assert_eq!(errors.get("email"), Some("This is a required field"));
//! ```

mod errors;
mod rules;
mod schema;
mod tag;
mod traits;
mod validators;
mod value;
mod walker;

pub use errors::*;
pub use rules::*;
pub use schema::{FieldDescriptor, Schema, SchemaBuilder};
pub use tag::{parse_tag, split_list, RuleInvocation};
pub use traits::*;
pub use validators::*;
pub use value::*;
pub use walker::*;
