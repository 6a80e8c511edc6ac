//! Name lookups over built model collections.
//!
//! Each returns the first match in collection order; no match is `None`.

use super::{Definition, MainProperty, OneOfProperty};

pub fn find_main_property_by_name<'a>(
    main_properties: &'a [MainProperty],
    name: &str,
) -> Option<&'a MainProperty> {
    main_properties.iter().find(|p| p.name == name)
}

pub fn find_definition_by_main_property_name<'a>(
    definitions: &'a [Definition],
    main_property_name: &str,
) -> Option<&'a Definition> {
    definitions
        .iter()
        .find(|d| d.main_property_name.as_deref() == Some(main_property_name))
}

pub fn find_one_of_property_by_enum_name<'a>(
    one_of_properties: &'a [OneOfProperty],
    enum_name: &str,
) -> Option<&'a OneOfProperty> {
    one_of_properties
        .iter()
        .find(|p| p.enum_name.as_deref() == Some(enum_name))
}

pub fn find_definition_by_name<'a>(definitions: &'a [Definition], name: &str) -> Option<&'a Definition> {
    definitions.iter().find(|d| d.name == name)
}
