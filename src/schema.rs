//! Schema document types
//!
//! A [`SchemaDocument`] is the immutable input of every resolution. It is
//! built by a single load pass that strips the cosmetic `format` keyword and
//! deserializes the JSON into typed [`SchemaNode`]s, so the resolver never
//! re-probes raw JSON shapes.

use std::path::Path;

use include_dir::{include_dir, Dir};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::{ModelError, Result};

/// Schemas compiled into the binary
static EMBEDDED_SCHEMAS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/schemas");

/// File name of the bundled dfx.json schema inside `schemas/`
pub const BUNDLED_SCHEMA: &str = "dfx.json";

static BUNDLED_DOCUMENT: Lazy<std::result::Result<SchemaDocument, String>> = Lazy::new(|| {
    let file = EMBEDDED_SCHEMAS
        .get_file(BUNDLED_SCHEMA)
        .ok_or_else(|| BUNDLED_SCHEMA.to_string())?;
    let content = file
        .contents_utf8()
        .ok_or_else(|| format!("{BUNDLED_SCHEMA} is not valid UTF-8"))?;
    SchemaDocument::from_str(content).map_err(|e| e.to_string())
});

/// Keyword removed from every schema node at load time
const FORMAT_KEYWORD: &str = "format";

/// Keywords whose object values are keyed by names, not by keywords
const NAME_KEYED: [&str; 3] = ["properties", "definitions", "patternProperties"];

// =============================================================================
// Schema Nodes
// =============================================================================

/// Declared `type` of a node: a single name or an ordered list of names
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeDecl {
    One(String),
    Many(Vec<String>),
}

impl TypeDecl {
    /// Declared names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        let names: &[String] = match self {
            TypeDecl::One(name) => std::slice::from_ref(name),
            TypeDecl::Many(names) => names,
        };
        names.iter().map(String::as_str)
    }
}

/// The `items` keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Items {
    /// Positional item schemas (not resolved)
    Tuple(Vec<SchemaNode>),
    /// A single schema for every element
    Schema(Box<SchemaNode>),
    /// `true` / `false`
    Bool(bool),
}

/// The `additionalProperties` keyword
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaNode>),
}

/// Composition kind of a node, decided once by keyword presence.
///
/// Precedence is `anyOf`, then `additionalProperties`, then `allOf`, then
/// `oneOf`; a node with none of them is [`Composition::Singular`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composition {
    AnyOf,
    AdditionalProperties,
    AllOf,
    OneOf,
    Singular,
}

/// A JSON Schema node restricted to the keywords the model understands.
///
/// Every other keyword is ignored during deserialization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_decl: Option<TypeDecl>,

    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<IndexMap<String, SchemaNode>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Items>,

    #[serde(rename = "additionalProperties", default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<AdditionalProperties>,

    #[serde(rename = "anyOf", default, skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<SchemaNode>>,

    #[serde(rename = "allOf", default, skip_serializing_if = "Option::is_none")]
    pub all_of: Option<Vec<SchemaNode>>,

    #[serde(rename = "oneOf", default, skip_serializing_if = "Option::is_none")]
    pub one_of: Option<Vec<SchemaNode>>,

    #[serde(rename = "$ref", default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

impl SchemaNode {
    /// Pick the composition strategy for this node
    pub fn composition(&self) -> Composition {
        if self.any_of.is_some() {
            Composition::AnyOf
        } else if self.additional_properties.is_some() {
            Composition::AdditionalProperties
        } else if self.all_of.is_some() {
            Composition::AllOf
        } else if self.one_of.is_some() {
            Composition::OneOf
        } else {
            Composition::Singular
        }
    }

    /// Declared type names, empty when `type` is absent
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.type_decl.iter().flat_map(|decl| decl.names())
    }

    /// Whether `type` names `"object"`, either alone or in a list
    pub fn declares_object(&self) -> bool {
        self.type_names().any(|name| name == "object")
    }

    /// Tag literal of a tagged-union variant.
    ///
    /// Object variants carry it in `properties.type.enum[0]`; bare enum
    /// variants use their own first literal.
    pub fn discriminant(&self) -> Option<String> {
        let literal = match &self.properties {
            Some(properties) => properties
                .get("type")
                .and_then(|tag| tag.enum_values.as_ref())
                .and_then(|values| values.first()),
            None => self.enum_values.as_ref().and_then(|values| values.first()),
        };
        literal.map(literal_text)
    }
}

/// Text of an enum literal: strings verbatim, anything else as JSON
pub fn literal_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// =============================================================================
// Document
// =============================================================================

/// An immutable, format-stripped JSON Schema document
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaDocument {
    /// The stripped JSON, kept for text-based heuristics
    raw: Value,
    /// Root node (top-level `properties` live here)
    root: SchemaNode,
    /// Top-level `definitions`, in declaration order
    definitions: IndexMap<String, SchemaNode>,
}

impl SchemaDocument {
    /// Build a document from parsed JSON
    pub fn from_value(value: Value) -> Result<Self> {
        if !value.is_object() {
            return Err(ModelError::InvalidDocument(
                "schema root must be a JSON object".to_string(),
            ));
        }

        let raw = strip_format(&value);
        let root: SchemaNode = serde_json::from_value(raw.clone())?;
        let definitions = match raw.get("definitions") {
            Some(definitions) => serde_json::from_value(definitions.clone())?,
            None => IndexMap::new(),
        };

        debug!(
            properties = root.properties.as_ref().map_or(0, IndexMap::len),
            definitions = definitions.len(),
            "loaded schema document"
        );

        Ok(Self { raw, root, definitions })
    }

    /// Parse a document from JSON text
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(content)?;
        Self::from_value(value)
    }

    /// Read and parse a document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "loading schema document");
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// The dfx.json schema compiled into the crate, loaded once per process
    pub fn bundled() -> Result<&'static SchemaDocument> {
        BUNDLED_DOCUMENT
            .as_ref()
            .map_err(|reason| ModelError::AssetMissing(reason.clone()))
    }

    /// Root schema node
    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// Stripped JSON of the whole document
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Top-level properties in declaration order
    pub fn properties(&self) -> impl Iterator<Item = (&String, &SchemaNode)> {
        self.root.properties.iter().flatten()
    }

    /// Top-level properties as stripped JSON, in declaration order
    pub fn raw_properties(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.raw
            .get("properties")
            .and_then(Value::as_object)
            .into_iter()
            .flatten()
    }

    /// Named definitions in declaration order
    pub fn definitions(&self) -> &IndexMap<String, SchemaNode> {
        &self.definitions
    }

    /// Direct lookup of a definition by name
    pub fn definition(&self, name: &str) -> Option<&SchemaNode> {
        self.definitions.get(name)
    }

    /// Dereference a `#/definitions/<Name>` pointer.
    ///
    /// The name is the third `/`-separated segment. Any other pointer form,
    /// or an unknown name, yields `None`.
    pub fn resolve_ref(&self, reference: &str) -> Option<&SchemaNode> {
        let target = reference.split('/').nth(2);
        let node = target.and_then(|name| self.definition(name));
        if node.is_none() {
            debug!(reference, "unresolved $ref");
        }
        node
    }
}

/// Remove every `format` keyword, returning a new value.
///
/// Keys of name-keyed maps (`properties`, `definitions`) are property or
/// definition names, so a property called `format` survives. Idempotent.
pub fn strip_format(value: &Value) -> Value {
    strip_keyword(value, false)
}

fn strip_keyword(value: &Value, name_keyed: bool) -> Value {
    match value {
        Value::Object(map) => map
            .iter()
            .filter(|(key, _)| name_keyed || key.as_str() != FORMAT_KEYWORD)
            .map(|(key, child)| {
                let child_keyed = !name_keyed && NAME_KEYED.contains(&key.as_str());
                (key.clone(), strip_keyword(child, child_keyed))
            })
            .collect(),
        Value::Array(items) => items.iter().map(|item| strip_keyword(item, false)).collect(),
        other => other.clone(),
    }
}
