//! dfx Schema Model
//!
//! Flattens the `dfx.json` configuration JSON Schema into a property model
//! that drives editor assistance (completions, hovers) without interpreting
//! raw schema syntax at lookup time.
//!
//! ## Features
//!
//! - **Typed Loading**: one pass strips `format` keywords and deserializes typed nodes
//! - **Property Forest**: `anyOf`, `allOf`, `oneOf`, `additionalProperties`,
//!   `items` and `$ref` resolved into plain [`Prop`] trees
//! - **Definition Index**: named definitions with tagged-union variant metadata
//! - **Lookups**: find by property name, definition name or discriminant
//! - **Candid UI**: webview content for deployed canisters
//!
//! ## Example
//!
//! ```rust,no_run
//! use dfx_schemas::SchemaModel;
//!
//! let model = SchemaModel::bundled().unwrap();
//! if let Some(fields) = model.variant_fields("canisters", "rust") {
//!     println!("required: {:?}", fields.required);
//! }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod panel;
pub mod schema;

pub use config::ModelConfig;
pub use error::{ModelError, Result};
pub use model::{
    Definition, MainProperty, OneOfProperty, Prop, Property, SchemaModel, Type, VariantFields,
};
pub use panel::{CandidUiPanel, PanelView};
pub use schema::{Composition, SchemaDocument, SchemaNode};
