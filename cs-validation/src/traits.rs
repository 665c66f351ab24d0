// Validation traits

use crate::Schema;
use std::collections::{BTreeMap, HashMap};

/// Receiver for `(field key, message)` pairs produced by a validation walk.
///
/// The walker only ever appends. What "append" means (overwrite, collect,
/// log) is up to the implementation.
pub trait ErrorSink {
    /// Record a failure for a field key.
    fn append_error_field(&mut self, name: &str, message: &str);
}

impl ErrorSink for HashMap<String, String> {
    fn append_error_field(&mut self, name: &str, message: &str) {
        self.insert(name.to_string(), message.to_string());
    }
}

impl ErrorSink for BTreeMap<String, String> {
    fn append_error_field(&mut self, name: &str, message: &str) {
        self.insert(name.to_string(), message.to_string());
    }
}

impl ErrorSink for Vec<(String, String)> {
    fn append_error_field(&mut self, name: &str, message: &str) {
        self.push((name.to_string(), message.to_string()));
    }
}

impl<S: ErrorSink + ?Sized> ErrorSink for &mut S {
    fn append_error_field(&mut self, name: &str, message: &str) {
        (**self).append_error_field(name, message);
    }
}

/// Sink that logs every entry before forwarding it to an inner sink.
pub struct LoggingSink<S> {
    inner: S,
    label: &'static str,
}

impl<S: ErrorSink> LoggingSink<S> {
    /// Wrap a sink
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            label: "validation",
        }
    }

    /// Set the label attached to each log line
    pub fn with_label(mut self, label: &'static str) -> Self {
        self.label = label;
        self
    }

    /// Get the wrapped sink
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: ErrorSink> ErrorSink for LoggingSink<S> {
    fn append_error_field(&mut self, name: &str, message: &str) {
        tracing::info!(sink = self.label, field = name, message, "Field failed validation");
        self.inner.append_error_field(name, message);
    }
}

/// Types with a static validation field table.
///
/// Implementations usually keep the schema in a `once_cell::sync::Lazy` so
/// annotations are parsed once per process.
pub trait Validate: Sized + 'static {
    /// The field table used to walk values of this type.
    fn schema() -> &'static Schema<Self>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_keeps_duplicates() {
        let mut sink: Vec<(String, String)> = Vec::new();
        sink.append_error_field("a", "one");
        sink.append_error_field("a", "two");
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_logging_sink_forwards() {
        let mut sink = LoggingSink::new(HashMap::<String, String>::new()).with_label("test");
        sink.append_error_field("name", "This is a required field");

        let inner = sink.into_inner();
        assert_eq!(inner.get("name").map(String::as_str), Some("This is a required field"));
    }

    #[test]
    fn test_mut_ref_is_a_sink() {
        fn fill(mut sink: impl ErrorSink) {
            sink.append_error_field("x", "y");
        }

        let mut map: BTreeMap<String, String> = BTreeMap::new();
        fill(&mut map);
        assert_eq!(map.len(), 1);
    }
}
