// Per-type field tables

use crate::tag::{parse_tag, RuleInvocation};
use crate::{FieldValue, ValidationError};
use std::fmt;

type Accessor<T> = Box<dyn for<'a> Fn(&'a T) -> FieldValue<'a> + Send + Sync>;
type Guard<T> = Box<dyn Fn(&T) -> Result<(), String> + Send + Sync>;

/// One validated field: its name, how to read it, and its parsed rules.
pub struct FieldDescriptor<T> {
    name: String,
    tag: String,
    rules: Vec<RuleInvocation>,
    accessor: Accessor<T>,
}

impl<T> FieldDescriptor<T> {
    /// Semantic name, used as the sink key.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Annotation as declared.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Parsed rule invocations, in declaration order.
    pub fn rules(&self) -> &[RuleInvocation] {
        &self.rules
    }

    /// Current value of this field on `record`.
    pub fn value<'a>(&self, record: &'a T) -> FieldValue<'a> {
        (self.accessor)(record)
    }
}

/// Field table for a record type, built once and reused for every walk.
pub struct Schema<T> {
    fields: Vec<FieldDescriptor<T>>,
    guard: Option<Guard<T>>,
}

impl<T: 'static> Schema<T> {
    /// Start a new schema
    pub fn builder() -> SchemaBuilder<T> {
        SchemaBuilder {
            fields: Vec::new(),
            guard: None,
        }
    }
}

impl<T> Schema<T> {
    /// Fields in declaration order
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    /// Look up a field by semantic name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor<T>> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Run the shape guard, if any.
    pub(crate) fn check_shape(&self, record: &T) -> Result<(), ValidationError> {
        match &self.guard {
            Some(guard) => guard(record).map_err(ValidationError::NotAStruct),
            None => Ok(()),
        }
    }
}

impl Schema<serde_json::Value> {
    /// Schema over JSON objects: each `(name, annotation)` pair reads the
    /// object member of that name. Non-object values fail the shape check.
    pub fn json<I, N, A>(fields: I) -> Self
    where
        I: IntoIterator<Item = (N, A)>,
        N: Into<String>,
        A: AsRef<str>,
    {
        let builder = Self::builder().guard(|value: &serde_json::Value| {
            if value.is_object() {
                Ok(())
            } else {
                Err(json_kind(value).to_string())
            }
        });

        fields
            .into_iter()
            .fold(builder, |builder, (name, tag)| {
                let name = name.into();
                let key = name.clone();
                builder.field(name, tag.as_ref(), move |value: &serde_json::Value| {
                    value
                        .get(&key)
                        .map(FieldValue::from_json)
                        .unwrap_or(FieldValue::Absent)
                })
            })
            .build()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

impl<T> fmt::Debug for Schema<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field(
                "fields",
                &self
                    .fields
                    .iter()
                    .map(|field| (&field.name, &field.tag))
                    .collect::<Vec<_>>(),
            )
            .field("guarded", &self.guard.is_some())
            .finish()
    }
}

/// Builder for [`Schema`]
pub struct SchemaBuilder<T> {
    fields: Vec<FieldDescriptor<T>>,
    guard: Option<Guard<T>>,
}

impl<T: 'static> SchemaBuilder<T> {
    /// Declare a field.
    ///
    /// `name` should be the serialized name when the type has one. The
    /// annotation is parsed here, once.
    pub fn field<F>(mut self, name: impl Into<String>, tag: &str, accessor: F) -> Self
    where
        F: Fn(&T) -> FieldValue<'_> + Send + Sync + 'static,
    {
        self.fields.push(FieldDescriptor {
            name: name.into(),
            tag: tag.to_string(),
            rules: parse_tag(tag),
            accessor: Box::new(accessor),
        });
        self
    }

    /// Reject values of the wrong shape before any field is read.
    pub fn guard<F>(mut self, guard: F) -> Self
    where
        F: Fn(&T) -> Result<(), String> + Send + Sync + 'static,
    {
        self.guard = Some(Box::new(guard));
        self
    }

    pub fn build(self) -> Schema<T> {
        Schema {
            fields: self.fields,
            guard: self.guard,
        }
    }
}
