use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved field carrying the originating document's name.
/// Always present on a completed record; excluded from summary analysis.
pub const DOCUMENT_NAME_FIELD: &str = "Document_Name";

/// A structured record extracted from one document: field name to
/// string-or-null value. Created by the field extractor, immutable
/// thereafter (mutators are crate-internal).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedRecord {
    fields: BTreeMap<String, Option<String>>,
}

impl ExtractedRecord {
    /// Build a record from a parsed JSON object, normalizing every value
    /// to string-or-null: scalars are stringified, nulls preserved, and
    /// nested structures kept as compact JSON text.
    pub fn from_json_object(object: serde_json::Map<String, Value>) -> Self {
        let fields = object
            .into_iter()
            .map(|(name, value)| (name, normalize_value(value)))
            .collect();
        Self { fields }
    }

    pub(crate) fn set_document_name(&mut self, name: &str) {
        self.fields
            .insert(DOCUMENT_NAME_FIELD.to_string(), Some(name.to_string()));
    }

    pub fn document_name(&self) -> Option<&str> {
        self.fields
            .get(DOCUMENT_NAME_FIELD)
            .and_then(|v| v.as_deref())
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(|v| v.as_deref())
    }

    /// Number of extracted data fields, excluding the reserved name field.
    pub fn data_field_count(&self) -> usize {
        self.fields
            .keys()
            .filter(|k| k.as_str() != DOCUMENT_NAME_FIELD)
            .count()
    }

    pub fn fields(&self) -> &BTreeMap<String, Option<String>> {
        &self.fields
    }

    /// Fields suitable for rendering: null and empty-string values are
    /// skipped here, not removed from the record itself.
    pub fn presentable_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().filter_map(|(name, value)| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(|v| (name.as_str(), v))
        })
    }
}

fn normalize_value(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        nested @ (Value::Array(_) | Value::Object(_)) => Some(nested.to_string()),
    }
}
