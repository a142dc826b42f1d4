use serde::de::DeserializeOwned;
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Kind a required key's value must have.
#[derive(Debug, Clone, PartialEq)]
pub enum ValueKind {
    String,
    Integer,
    StringList,
    /// A list whose elements are JSON objects, optionally each checked
    /// against a nested descriptor.
    ObjectList(Option<ShapeDescriptor>),
}

impl ValueKind {
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Integer => "integer",
            ValueKind::StringList => "list of strings",
            ValueKind::ObjectList(_) => "list of objects",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub key: String,
    pub kind: ValueKind,
}

/// Required top-level keys of a JSON object the LLM was asked to produce.
///
/// Built once per call site with the chained constructors:
///
/// ```
/// use screening_backend::models::shape::ShapeDescriptor;
///
/// let shape = ShapeDescriptor::new()
///     .string("assessment")
///     .integer("score");
/// assert_eq!(shape.fields().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShapeDescriptor {
    fields: Vec<FieldSpec>,
}

impl ShapeDescriptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, kind: ValueKind) -> Self {
        self.fields.push(FieldSpec {
            key: key.into(),
            kind,
        });
        self
    }

    pub fn string(self, key: impl Into<String>) -> Self {
        self.field(key, ValueKind::String)
    }

    pub fn integer(self, key: impl Into<String>) -> Self {
        self.field(key, ValueKind::Integer)
    }

    pub fn string_list(self, key: impl Into<String>) -> Self {
        self.field(key, ValueKind::StringList)
    }

    pub fn object_list(self, key: impl Into<String>, element: Option<ShapeDescriptor>) -> Self {
        self.field(key, ValueKind::ObjectList(element))
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }
}

/// A JSON object that satisfied its [`ShapeDescriptor`].
///
/// Values are exactly what the LLM produced, undeclared keys included.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedValue(Map<String, JsonValue>);

impl DecodedValue {
    pub(crate) fn new(map: Map<String, JsonValue>) -> Self {
        Self(map)
    }

    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(|v| v.as_str())
    }

    pub fn int_field(&self, key: &str) -> Option<i64> {
        self.0.get(key).and_then(|v| v.as_i64())
    }

    pub fn string_list(&self, key: &str) -> Option<Vec<String>> {
        self.0.get(key).and_then(|v| v.as_array()).map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect()
        })
    }

    pub fn into_json(self) -> JsonValue {
        JsonValue::Object(self.0)
    }

    /// Deserialize into a caller's typed reply struct.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(JsonValue::Object(self.0))
    }
}
