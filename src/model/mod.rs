//! Property Model
//!
//! The flattened model built from a [`SchemaDocument`]: a forest of [`Prop`]
//! nodes, a [`Definition`] side table, and the list of [`MainProperty`]
//! entries. Editor features query it by name through [`SchemaModel`].

pub mod index;
pub mod lookup;
pub mod resolve;

pub use index::{build_definitions, build_main_properties};
pub use lookup::{
    find_definition_by_main_property_name, find_definition_by_name,
    find_main_property_by_name, find_one_of_property_by_enum_name,
};
pub use resolve::{build_props, Resolver};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::error::Result;
use crate::schema::SchemaDocument;

/// Name of the synthetic child holding the shape of map values
pub const ADDITIONAL_PROPERTIES: &str = "additionalProperties";

// =============================================================================
// Model Records
// =============================================================================

/// A declared type name (`"string"`, `"object"`, ...)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Type {
    pub name: String,
}

impl Type {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Normalized property node.
///
/// `types` is empty rather than absent when nothing is declared. For array
/// properties, primitive items set `type_for_array` and object items fill
/// `props_for_items`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prop {
    pub name: String,
    pub types: Vec<Type>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_for_array: Option<String>,
    pub props_for_items: Vec<Prop>,
    pub enums: Vec<Value>,
    pub required_properties: Vec<String>,
    pub properties: Vec<Prop>,
    pub one_of_properties: Vec<Prop>,
}

impl Prop {
    /// An empty node with the given name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Whether any declared type is `name`
    pub fn has_type(&self, name: &str) -> bool {
        self.types.iter().any(|t| t.name == name)
    }

    /// Child property by name
    pub fn property(&self, name: &str) -> Option<&Prop> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// True when this node is a map whose values share the shape of the
    /// single `additionalProperties` child
    pub fn is_map(&self) -> bool {
        matches!(self.properties.as_slice(), [only] if only.name == ADDITIONAL_PROPERTIES)
    }
}

/// A property declared directly on a definition or variant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub types: Vec<Type>,
}

/// One variant of a definition's `oneOf`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OneOfProperty {
    /// Discriminant literal selecting this variant
    pub enum_name: Option<String>,
    pub required_properties: Vec<String>,
    pub properties: Vec<Property>,
    /// Declared type, set only for scalar enum variants
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_: Option<Type>,
}

/// Lookup record for a named definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Definition {
    pub name: String,
    /// Top-level property that (heuristically) refers to this definition
    pub main_property_name: Option<String>,
    pub properties: Vec<Property>,
    pub one_of_properties: Vec<OneOfProperty>,
}

/// A top-level configuration key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainProperty {
    pub name: String,
    pub is_object: bool,
}

/// Required and optional field names of one tagged-union variant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantFields {
    pub required: Vec<String>,
    pub optional: Vec<String>,
}

impl From<&OneOfProperty> for VariantFields {
    fn from(variant: &OneOfProperty) -> Self {
        let optional = variant
            .properties
            .iter()
            .filter(|p| !variant.required_properties.contains(&p.name))
            .map(|p| p.name.clone())
            .collect();
        Self {
            required: variant.required_properties.clone(),
            optional,
        }
    }
}

// =============================================================================
// Schema Model
// =============================================================================

/// Everything built from one document, ready for name-based queries
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaModel {
    pub props: Vec<Prop>,
    pub main_properties: Vec<MainProperty>,
    pub definitions: Vec<Definition>,
}

impl SchemaModel {
    /// Resolve the property forest and index the definitions of `document`
    pub fn build(document: &SchemaDocument) -> Self {
        Self {
            props: build_props(document),
            main_properties: build_main_properties(document),
            definitions: build_definitions(document),
        }
    }

    /// Model of the bundled dfx.json schema
    pub fn bundled() -> Result<Self> {
        Ok(Self::build(SchemaDocument::bundled()?))
    }

    /// Top-level property by name
    pub fn prop(&self, name: &str) -> Option<&Prop> {
        self.props.iter().find(|p| p.name == name)
    }

    /// Top-level property names with their object-ness
    pub fn main_property_names(&self) -> impl Iterator<Item = (&str, bool)> {
        self.main_properties
            .iter()
            .map(|p| (p.name.as_str(), p.is_object))
    }

    pub fn main_property(&self, name: &str) -> Option<&MainProperty> {
        find_main_property_by_name(&self.main_properties, name)
    }

    /// Definition associated with a top-level property
    pub fn definition_for(&self, main_property: &str) -> Option<&Definition> {
        find_definition_by_main_property_name(&self.definitions, main_property)
    }

    pub fn definition(&self, name: &str) -> Option<&Definition> {
        find_definition_by_name(&self.definitions, name)
    }

    /// Required and optional fields of the variant tagged `tag` under the
    /// definition associated with `main_property`
    pub fn variant_fields(&self, main_property: &str, tag: &str) -> Option<VariantFields> {
        let definition = self.definition_for(main_property)?;
        find_one_of_property_by_enum_name(&definition.one_of_properties, tag).map(VariantFields::from)
    }
}
