//! Tracker wire types
//!
//! The generic pipeline/box representation the tracker exposes. Boxes are
//! transient: fetched fresh each run and never persisted locally.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Key identifying a pipeline in the tracker.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PipelineKey(String);

impl PipelineKey {
    /// Create a pipeline key.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PipelineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PipelineKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Opaque field code the tracker uses in place of a semantic attribute
/// name (e.g. `"1003"` for a member's email).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldCode(String);

impl FieldCode {
    /// Create a field code.
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Get the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FieldCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FieldCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Value of a single box field.
///
/// Dropdown selections arrive as text carrying the selected option code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Free-form or option-code text.
    Text(String),
    /// Numeric value.
    Number(f64),
}

impl FieldValue {
    /// Get the text content, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::Number(_) => None,
        }
    }

    /// Get the numeric content, if this is a number.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            FieldValue::Text(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        FieldValue::Number(n)
    }
}

/// A remote record fetched from a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteBox {
    /// Unique key within the pipeline.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Field-code keyed values.
    #[serde(default)]
    pub fields: BTreeMap<FieldCode, FieldValue>,
    /// Keys of boxes this box is linked to, possibly in other pipelines.
    #[serde(default)]
    pub linked_box_keys: Vec<String>,
}

impl RemoteBox {
    /// Create a box with the given key and name and no fields.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            fields: BTreeMap::new(),
            linked_box_keys: Vec::new(),
        }
    }

    /// Set a field using builder pattern.
    #[must_use]
    pub fn with_field(mut self, code: impl Into<FieldCode>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(code.into(), value.into());
        self
    }

    /// Add a linked box key using builder pattern.
    #[must_use]
    pub fn with_link(mut self, key: impl Into<String>) -> Self {
        self.linked_box_keys.push(key.into());
        self
    }

    /// Get a field value by code.
    #[must_use]
    pub fn field(&self, code: &FieldCode) -> Option<&FieldValue> {
        self.fields.get(code)
    }

    /// Get a text field by code.
    #[must_use]
    pub fn text_field(&self, code: &FieldCode) -> Option<&str> {
        self.field(code).and_then(FieldValue::as_text)
    }

    /// Check whether this box lists the given key among its links.
    #[must_use]
    pub fn links_to(&self, key: &str) -> bool {
        self.linked_box_keys.iter().any(|k| k == key)
    }
}

/// Kind of a pipeline field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free-form text.
    Text,
    /// Numeric.
    Number,
    /// Fixed option set; values are option codes.
    Dropdown,
}

impl FieldKind {
    /// Convert to string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Number => "number",
            FieldKind::Dropdown => "dropdown",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Definition of a field within a pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// The field's code.
    pub code: FieldCode,
    /// Human-readable field name.
    pub name: String,
    /// Field kind.
    pub kind: FieldKind,
}

/// Pipeline metadata.
///
/// Used only to validate configuration; the sync engine does not interpret
/// `field_definitions` beyond carrying them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    /// The pipeline's key.
    pub key: PipelineKey,
    /// Display name.
    pub name: String,
    /// Definitions of the fields boxes in this pipeline may carry.
    #[serde(default)]
    pub field_definitions: Vec<FieldDefinition>,
}
