//! Attribute schema
//!
//! A small declarative model of the attribute surface a data source exposes to the
//! infrastructure-as-code engine, plus the record type reads write into.
//!
//! # Module Structure
//!
//! - [`data`] - [`ResourceData`], the per-read record (config in, state out)
//! - [`derive`] - Derive a read-only schema from a full resource schema
//!
//! Values use `serde_json::Value` as the engine's generic representation; every write is
//! checked against the declared [`AttrType`].

pub mod data;
pub mod derive;

pub use data::ResourceData;
pub use derive::datasource_schema_from_resource_schema;

use serde_json::Value;
use std::collections::BTreeMap;

/// Type of an attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttrType {
    String,
    Int,
    Bool,
    List(Box<AttrType>),
    Set(Box<AttrType>),
    /// Nested block with its own attributes
    Object(Schema),
}

impl AttrType {
    pub fn list_of(elem: AttrType) -> Self {
        AttrType::List(Box::new(elem))
    }

    pub fn set_of(elem: AttrType) -> Self {
        AttrType::Set(Box::new(elem))
    }

    /// Short name used in error messages
    pub fn describe(&self) -> &'static str {
        match self {
            AttrType::String => "string",
            AttrType::Int => "integer",
            AttrType::Bool => "bool",
            AttrType::List(_) => "list",
            AttrType::Set(_) => "set",
            AttrType::Object(_) => "object",
        }
    }

    /// Check a value against this type. `path` locates the value in error messages.
    ///
    /// Nested objects may omit attributes but may not carry undeclared ones.
    pub fn check(&self, path: &str, value: &Value) -> Result<(), String> {
        match (self, value) {
            (AttrType::String, Value::String(_)) => Ok(()),
            // Floats are not integers even when whole
            (AttrType::Int, Value::Number(n)) if n.is_i64() || n.is_u64() => Ok(()),
            (AttrType::Bool, Value::Bool(_)) => Ok(()),
            // Sets are stored as arrays; no dedup here
            (AttrType::List(elem), Value::Array(items))
            | (AttrType::Set(elem), Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    elem.check(&format!("{}.{}", path, i), item)?;
                }
                Ok(())
            },
            (AttrType::Object(schema), Value::Object(map)) => {
                for (key, item) in map {
                    let Some(attr) = schema.get(key) else {
                        return Err(format!("{}: unsupported attribute {:?}", path, key));
                    };
                    attr.ty.check(&format!("{}.{}", path, key), item)?;
                }
                Ok(())
            },
            (ty, other) => Err(format!(
                "{}: expected {}, got {}",
                path,
                ty.describe(),
                json_kind(other)
            )),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A single declared attribute
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub ty: AttrType,
    pub description: &'static str,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
}

impl Attribute {
    fn new(ty: AttrType, description: &'static str) -> Self {
        Self {
            ty,
            description,
            required: false,
            optional: false,
            computed: false,
        }
    }

    /// Must be set in configuration
    pub fn required(ty: AttrType, description: &'static str) -> Self {
        Self {
            required: true,
            ..Self::new(ty, description)
        }
    }

    /// May be set in configuration
    pub fn optional(ty: AttrType, description: &'static str) -> Self {
        Self {
            optional: true,
            ..Self::new(ty, description)
        }
    }

    /// Read-only, filled by reads
    pub fn computed(ty: AttrType, description: &'static str) -> Self {
        Self {
            computed: true,
            ..Self::new(ty, description)
        }
    }

    /// Also filled by reads when left unset
    pub fn with_computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Neither required nor optional
    pub fn is_read_only(&self) -> bool {
        self.computed && !self.required && !self.optional
    }
}

/// Named set of attributes, iterated in key order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    attributes: BTreeMap<&'static str, Attribute>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute, builder style
    pub fn attr(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.attributes.insert(name, attribute);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Attribute)> {
        self.attributes.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

impl FromIterator<(&'static str, Attribute)> for Schema {
    fn from_iter<I: IntoIterator<Item = (&'static str, Attribute)>>(iter: I) -> Self {
        Self {
            attributes: iter.into_iter().collect(),
        }
    }
}
