//! Golden Tests for the Property Model
//!
//! Resolves fixture documents and the bundled dfx.json schema and checks the
//! shapes editor features depend on.

use dfx_schemas::{Prop, SchemaDocument, SchemaModel};

fn document(fixture: &str) -> SchemaDocument {
    SchemaDocument::from_str(fixture).unwrap()
}

fn type_names(prop: &Prop) -> Vec<&str> {
    prop.types.iter().map(|t| t.name.as_str()).collect()
}

fn child_names(props: &[Prop]) -> Vec<&str> {
    props.iter().map(|p| p.name.as_str()).collect()
}

// =============================================================================
// Fixture Documents
// =============================================================================

#[test]
fn test_tagged_variants_under_map() {
    let model = SchemaModel::build(&document(include_str!("fixtures/tagged_variants.json")));

    let canisters = model.prop("canisters").unwrap();
    assert!(canisters.is_map());

    let canister = &canisters.properties[0];
    assert_eq!(type_names(canister), vec!["object"]);
    assert_eq!(child_names(&canister.properties), vec!["main", "dependencies"]);
    assert_eq!(child_names(&canister.one_of_properties), vec!["rust", "motoko"]);

    let rust = &canister.one_of_properties[0];
    assert_eq!(child_names(&rust.properties), vec!["type", "candid", "crate", "package"]);
    assert_eq!(rust.required_properties, vec!["candid", "package", "type"]);

    let fields = model.variant_fields("canisters", "rust").unwrap();
    assert_eq!(fields.required, vec!["candid", "package", "type"]);
    assert_eq!(fields.optional, vec!["crate"]);
    assert!(model.variant_fields("dfx", "rust").is_none());
}

#[test]
fn test_all_of_over_union() {
    let model = SchemaModel::build(&document(include_str!("fixtures/all_of_union.json")));

    let visibility = model.prop("log_visibility").unwrap();
    assert_eq!(visibility.name, "log_visibility");
    assert_eq!(type_names(visibility), vec!["object", "string"]);
    assert_eq!(child_names(&visibility.properties), vec!["allowed_viewers"]);
    assert_eq!(
        child_names(&visibility.one_of_properties),
        vec!["controllers", "public", "allowed_viewers"]
    );

    let post_install = model.prop("post_install").unwrap();
    assert_eq!(type_names(post_install), vec!["string", "array"]);
    assert_eq!(post_install.type_for_array.as_deref(), Some("string"));

    let declarations = model.prop("declarations").unwrap();
    assert_eq!(type_names(declarations), vec!["object"]);
    assert_eq!(child_names(&declarations.properties), vec!["bindings", "output"]);
    assert_eq!(declarations.properties[0].type_for_array.as_deref(), Some("string"));
}

#[test]
fn test_array_items() {
    let model = SchemaModel::build(&document(include_str!("fixtures/array_items.json")));

    let metadata = model.prop("metadata").unwrap();
    assert!(metadata.type_for_array.is_none());
    assert_eq!(child_names(&metadata.props_for_items), vec!["name", "networks"]);
    assert_eq!(metadata.props_for_items[1].type_for_array.as_deref(), Some("string"));
    assert_eq!(metadata.required_properties, vec!["name"]);

    let levels = model.prop("levels").unwrap();
    assert_eq!(levels.type_for_array.as_deref(), Some("string"));
    assert_eq!(
        levels.enums,
        vec![serde_json::json!("error"), serde_json::json!("info"), serde_json::json!("debug")]
    );
    assert!(levels.props_for_items.is_empty());

    let matrix = model.prop("matrix").unwrap();
    assert_eq!(matrix.type_for_array.as_deref(), Some("number"));

    let tuple = model.prop("tuple").unwrap();
    assert_eq!(type_names(tuple), vec!["array"]);
    assert!(tuple.type_for_array.is_none());
    assert!(tuple.props_for_items.is_empty());
}

#[test]
fn test_cyclic_reference_terminates() {
    let model = SchemaModel::build(&document(include_str!("fixtures/cyclic.json")));

    let mut node = model.prop("tree").unwrap();
    let mut depth = 0;
    while let Some(child) = node.property("child") {
        depth += 1;
        node = child;
    }
    assert!(depth > 1);
    assert!(depth < 64);
}

#[test]
fn test_build_is_idempotent() {
    let doc = document(include_str!("fixtures/all_of_union.json"));
    assert_eq!(SchemaModel::build(&doc), SchemaModel::build(&doc));
}

// =============================================================================
// Bundled dfx.json
// =============================================================================

#[test]
fn test_bundled_main_properties() {
    let model = SchemaModel::bundled().unwrap();

    let flags: Vec<_> = model.main_property_names().collect();
    assert_eq!(
        flags,
        vec![
            ("canisters", true),
            ("defaults", false),
            ("dfx", false),
            ("networks", true),
            ("output_env_file", false),
            ("profile", false),
            ("version", false),
        ]
    );
}

#[test]
fn test_bundled_format_stripped() {
    let doc = SchemaDocument::bundled().unwrap();
    assert!(doc.raw()["properties"]["version"].get("format").is_none());
    assert!(!doc.raw().to_string().contains("\"format\""));
}

#[test]
fn test_bundled_canister_shape() {
    let model = SchemaModel::bundled().unwrap();

    let canisters = model.prop("canisters").unwrap();
    assert!(canisters.is_map());
    let canister = &canisters.properties[0];
    assert_eq!(
        child_names(&canister.one_of_properties),
        vec!["rust", "assets", "custom", "motoko", "pull"]
    );

    let metadata = canister.property("metadata").unwrap();
    assert_eq!(
        child_names(&metadata.props_for_items),
        vec!["content", "name", "networks", "path", "visibility"]
    );
    assert_eq!(metadata.required_properties, vec!["name"]);

    let dependencies = canister.property("dependencies").unwrap();
    assert_eq!(dependencies.type_for_array.as_deref(), Some("string"));

    let canister_type = canister.property("type").unwrap();
    assert_eq!(canister_type.one_of_properties.len(), 5);

    let remote = canister.property("remote").unwrap();
    assert!(remote.has_type("object") && remote.has_type("null"));
    assert!(remote.property("id").unwrap().is_map());
}

#[test]
fn test_bundled_any_of_defaults() {
    let model = SchemaModel::bundled().unwrap();

    let defaults = model.prop("defaults").unwrap();
    assert_eq!(type_names(defaults), vec!["object", "null"]);
    assert_eq!(
        child_names(&defaults.properties),
        vec!["bitcoin", "build", "canister_http", "replica"]
    );

    let port = defaults.property("replica").unwrap().property("port").unwrap();
    assert_eq!(type_names(port), vec!["integer", "null"]);

    let profile = model.prop("profile").unwrap();
    assert_eq!(type_names(profile), vec!["string", "null"]);
    assert_eq!(profile.enums, vec![serde_json::json!("Debug"), serde_json::json!("Release")]);
}

#[test]
fn test_bundled_definition_lookups() {
    let model = SchemaModel::bundled().unwrap();

    assert_eq!(model.definition_for("canisters").unwrap().name, "ConfigCanistersCanister");
    assert_eq!(model.definition_for("defaults").unwrap().name, "ConfigDefaults");
    assert_eq!(model.definition_for("networks").unwrap().name, "ConfigNetwork");
    assert!(model.definition_for("dfx").is_none());

    let assets = model.variant_fields("canisters", "assets").unwrap();
    assert_eq!(assets.required, vec!["source", "type"]);
    assert_eq!(assets.optional, vec!["build", "workspace"]);

    let motoko = model.variant_fields("canisters", "motoko").unwrap();
    assert_eq!(motoko.required, vec!["type"]);
    assert!(motoko.optional.is_empty());

    let levels = model.definition("ReplicaLogLevel").unwrap();
    assert!(levels.main_property_name.is_none());
    assert!(levels.one_of_properties.is_empty());
}
