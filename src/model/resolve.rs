//! Property Resolution
//!
//! Walks a document's `properties` and flattens each entry into a [`Prop`].
//! Each property is dispatched by its [`Composition`]; the composition
//! strategies follow `$ref` pointers into `definitions`, recurse into array
//! `items`, and bottom out in the singular strategy.
//!
//! Schemas are expected to be acyclic. A depth limit shared by nested
//! properties, array items and nested maps stops runaway recursion on
//! documents that are not.

use std::cell::Cell;

use serde_json::Value;
use tracing::{debug, warn};

use super::{Prop, Type, ADDITIONAL_PROPERTIES};
use crate::schema::{AdditionalProperties, Composition, Items, SchemaDocument, SchemaNode};

/// Maximum nesting of `properties`, `items` and `additionalProperties`
/// followed during one resolution
const MAX_DEPTH: usize = 64;

/// Resolve the top-level property forest of `document`
pub fn build_props(document: &SchemaDocument) -> Vec<Prop> {
    Resolver::new(document).build()
}

/// Recursive-descent resolver over one document
pub struct Resolver<'a> {
    document: &'a SchemaDocument,
    depth: Cell<usize>,
}

impl<'a> Resolver<'a> {
    pub fn new(document: &'a SchemaDocument) -> Self {
        Self {
            document,
            depth: Cell::new(0),
        }
    }

    /// Resolve the document's top-level `properties`
    pub fn build(&self) -> Vec<Prop> {
        self.resolve_properties(self.document.root())
    }

    /// One [`Prop`] per key of `node.properties`, in declaration order
    pub fn resolve_properties(&self, node: &SchemaNode) -> Vec<Prop> {
        let Some(properties) = &node.properties else {
            return Vec::new();
        };

        self.nested(|| {
            properties
                .iter()
                .map(|(key, child)| self.resolve_property(key, child))
                .collect()
        })
    }

    /// Run `f` one level deeper. Past [`MAX_DEPTH`] the step is skipped and
    /// yields the default value.
    fn nested<T: Default>(&self, f: impl FnOnce() -> T) -> T {
        let depth = self.depth.get();
        if depth >= MAX_DEPTH {
            warn!(depth, "schema nesting too deep, assuming a cyclic schema");
            return T::default();
        }

        self.depth.set(depth + 1);
        let result = f();
        self.depth.set(depth);
        result
    }

    fn resolve_property(&self, key: &str, node: &SchemaNode) -> Prop {
        let mut prop = Prop::named(key);
        let composition = node.composition();
        debug!(property = key, ?composition, "resolving property");

        match composition {
            Composition::AnyOf => self.build_any_of(node, &mut prop),
            Composition::AdditionalProperties => self.build_additional_properties(node, &mut prop),
            Composition::AllOf => self.build_all_of(node, &mut prop, key),
            Composition::OneOf => {
                self.build_singular(node, &mut prop);
                self.build_one_of(node, &mut prop);
            }
            Composition::Singular => self.build_singular(node, &mut prop),
        }
        prop
    }

    // =========================================================================
    // Composition Strategies
    // =========================================================================

    fn build_singular(&self, node: &SchemaNode, prop: &mut Prop) {
        prop.types = resolve_types(node);
        prop.enums = resolve_enums(node);
        prop.required_properties = resolve_required(node);
        self.resolve_items(node, prop);
        prop.properties = self.resolve_properties(node);
    }

    /// Union of every branch; no de-duplication
    fn build_any_of(&self, node: &SchemaNode, prop: &mut Prop) {
        for branch in node.any_of.iter().flatten() {
            if branch.type_decl.is_some() {
                prop.types.extend(resolve_types(branch));
                self.resolve_items(branch, prop);
            }
            if let Some(target) = self.dereference(branch) {
                self.merge_definition(target, prop);
            }
        }
    }

    /// Map of arbitrary keys; the value shape goes into a single synthetic
    /// `additionalProperties` child
    fn build_additional_properties(&self, node: &SchemaNode, prop: &mut Prop) {
        let mut child = Prop::named(ADDITIONAL_PROPERTIES);
        prop.types = vec![Type::new("object")];

        if let Some(AdditionalProperties::Schema(values)) = &node.additional_properties {
            prop.types.extend(resolve_types(values));

            if let Some(target) = self.dereference(values) {
                child.types = resolve_types(target);
                child.enums = resolve_enums(target);
                child.required_properties = resolve_required(target);
                child.properties = self.resolve_properties(target);
                if target.one_of.is_some() {
                    self.build_one_of(target, &mut child);
                }
                // `true`/`false` only open or close the object
                if let Some(AdditionalProperties::Schema(_)) = &target.additional_properties {
                    let nested = self.nested(|| {
                        let mut nested = Prop::named(ADDITIONAL_PROPERTIES);
                        self.build_additional_properties(target, &mut nested);
                        nested.properties
                    });
                    child.properties.extend(nested);
                }
                self.resolve_items(target, prop);
            }
        }

        prop.properties = vec![child];
    }

    /// Intersection of branches, merged field by field.
    ///
    /// A referenced target that is itself an `anyOf` (optionally with a
    /// `oneOf` of tagged variants) is resolved through those strategies
    /// first. The result always carries the caller's key as its name.
    fn build_all_of(&self, node: &SchemaNode, prop: &mut Prop, key: &str) {
        for branch in node.all_of.iter().flatten() {
            if branch.type_decl.is_some() {
                prop.types.extend(resolve_types(branch));
                self.resolve_items(branch, prop);
            }
            let Some(target) = self.dereference(branch) else {
                continue;
            };

            if target.any_of.is_some() {
                let mut union = Prop::named(key);
                self.build_any_of(target, &mut union);
                if target.one_of.is_some() {
                    self.build_one_of(target, &mut union);
                }
                absorb(prop, union);
            } else {
                self.merge_definition(target, prop);
            }
        }
        prop.name = key.to_string();
    }

    /// One independent [`Prop`] per variant, named by its discriminant
    fn build_one_of(&self, node: &SchemaNode, prop: &mut Prop) {
        prop.one_of_properties = node
            .one_of
            .iter()
            .flatten()
            .map(|variant| {
                let mut variant_prop = Prop::named(variant.discriminant().unwrap_or_default());
                self.build_singular(variant, &mut variant_prop);
                variant_prop
            })
            .collect();
    }

    // =========================================================================
    // References & Items
    // =========================================================================

    /// Target of `node.$ref`, if it has one that resolves
    fn dereference(&self, node: &SchemaNode) -> Option<&'a SchemaNode> {
        let reference = node.reference.as_deref()?;
        self.document.resolve_ref(reference)
    }

    /// Merge a dereferenced definition into `prop`
    fn merge_definition(&self, target: &SchemaNode, prop: &mut Prop) {
        prop.types.extend(resolve_types(target));
        prop.properties.extend(self.resolve_properties(target));
        prop.enums.extend(resolve_enums(target));
        prop.required_properties.extend(resolve_required(target));
        self.resolve_items(target, prop);
    }

    /// Element metadata of an array node
    fn resolve_items(&self, node: &SchemaNode, prop: &mut Prop) {
        let Some(Items::Schema(items)) = &node.items else {
            return;
        };

        if items.type_decl.is_some() {
            prop.type_for_array = items.type_names().next().map(str::to_string);
        } else if let Some(target) = self.dereference(items) {
            self.build_item_prop(target, prop);
        }
    }

    /// Shape of referenced array elements. Nested `items` recurse so arrays
    /// of arrays land on the same node; the element's enums and required
    /// names are carried onto the array property.
    fn build_item_prop(&self, target: &SchemaNode, prop: &mut Prop) {
        self.nested(|| {
            self.resolve_items(target, prop);
            prop.props_for_items = self.resolve_properties(target);
            prop.enums.extend(resolve_enums(target));
            prop.required_properties.extend(resolve_required(target));

            if prop.props_for_items.is_empty() && prop.type_for_array.is_none() && !target.declares_object() {
                prop.type_for_array = target.type_names().next().map(str::to_string);
            }
        })
    }
}

/// Fold the fields of a resolved `anyOf` target into `prop`
fn absorb(prop: &mut Prop, union: Prop) {
    prop.types.extend(union.types);
    prop.required_properties.extend(union.required_properties);
    prop.enums.extend(union.enums);
    prop.properties.extend(union.properties);
    prop.one_of_properties.extend(union.one_of_properties);
    if union.type_for_array.is_some() {
        prop.type_for_array = union.type_for_array;
    }
    if !union.props_for_items.is_empty() {
        prop.props_for_items = union.props_for_items;
    }
}

/// One [`Type`] per declared name, in order
pub fn resolve_types(node: &SchemaNode) -> Vec<Type> {
    node.type_names().map(Type::new).collect()
}

fn resolve_enums(node: &SchemaNode) -> Vec<Value> {
    node.enum_values.clone().unwrap_or_default()
}

fn resolve_required(node: &SchemaNode) -> Vec<String> {
    node.required.clone().unwrap_or_default()
}
