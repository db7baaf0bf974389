//! Schema derivation
//!
//! Data sources reuse the schema of the matching resource for nested blocks, with
//! every attribute turned read-only.

use super::{AttrType, Attribute, Schema};

/// Derive a data source schema from a resource schema
///
/// Every attribute becomes computed and loses `required`/`optional`, recursively
/// through nested objects, lists and sets.
pub fn datasource_schema_from_resource_schema(resource: &Schema) -> Schema {
    resource
        .iter()
        .map(|(name, attr)| {
            (
                name,
                Attribute {
                    ty: read_only_type(&attr.ty),
                    description: attr.description,
                    required: false,
                    optional: false,
                    computed: true,
                },
            )
        })
        .collect()
}

fn read_only_type(ty: &AttrType) -> AttrType {
    match ty {
        AttrType::List(elem) => AttrType::list_of(read_only_type(elem)),
        AttrType::Set(elem) => AttrType::set_of(read_only_type(elem)),
        AttrType::Object(schema) => {
            AttrType::Object(datasource_schema_from_resource_schema(schema))
        },
        // Scalars carry no nested flags
        scalar => scalar.clone(),
    }
}
