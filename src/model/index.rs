//! Definition Indexing
//!
//! Flattens the top-level `definitions` map into [`Definition`] records and
//! lists the top-level keys as [`MainProperty`] entries.

use tracing::debug;

use super::resolve::resolve_types;
use super::{Definition, MainProperty, OneOfProperty, Property, Type};
use crate::schema::{SchemaDocument, SchemaNode};

/// One [`Definition`] per entry of `definitions`, in declaration order
pub fn build_definitions(document: &SchemaDocument) -> Vec<Definition> {
    // Serialized once, scanned once per definition
    let serialized: Vec<(&String, String)> = document
        .raw_properties()
        .map(|(name, value)| (name, value.to_string()))
        .collect();

    document
        .definitions()
        .iter()
        .map(|(name, node)| {
            let main_property_name = serialized
                .iter()
                .find(|(_, text)| text.contains(name.as_str()))
                .map(|(property, _)| property.to_string());
            debug!(definition = %name, main_property = ?main_property_name, "indexed definition");

            Definition {
                name: name.clone(),
                main_property_name,
                properties: flat_properties(node),
                one_of_properties: node.one_of.iter().flatten().map(one_of_property).collect(),
            }
        })
        .collect()
}

/// Top-level keys; object-ness comes from the declared type set
pub fn build_main_properties(document: &SchemaDocument) -> Vec<MainProperty> {
    document
        .properties()
        .map(|(name, node)| MainProperty {
            name: name.clone(),
            is_object: node.declares_object(),
        })
        .collect()
}

fn flat_properties(node: &SchemaNode) -> Vec<Property> {
    node.properties
        .iter()
        .flatten()
        .map(|(name, child)| Property {
            name: name.clone(),
            types: resolve_types(child),
        })
        .collect()
}

fn one_of_property(variant: &SchemaNode) -> OneOfProperty {
    if variant.properties.is_some() {
        OneOfProperty {
            enum_name: variant.discriminant(),
            required_properties: variant.required.clone().unwrap_or_default(),
            properties: flat_properties(variant),
            type_: None,
        }
    } else if variant.enum_values.is_some() {
        OneOfProperty {
            enum_name: variant.discriminant(),
            type_: variant.type_names().next().map(Type::new),
            ..OneOfProperty::default()
        }
    } else {
        OneOfProperty::default()
    }
}
