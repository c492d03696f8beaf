use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A JSON Schema type keyword value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Array,
    Object,
    Null,
}

/// The `type` field can be a single type or an array of types.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TypeSet {
    Single(SchemaType),
    Multiple(Vec<SchemaType>),
}

/// A reference or inline schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SchemaOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Schema(Box<Schema>),
}

impl SchemaOrRef {
    pub fn is_ref(&self) -> bool {
        matches!(self, SchemaOrRef::Ref { .. })
    }

    pub fn ref_path(&self) -> Option<&str> {
        match self {
            SchemaOrRef::Ref { ref_path } => Some(ref_path),
            SchemaOrRef::Schema(_) => None,
        }
    }
}

/// A JSON Schema object as used by OpenAPI 3.0 and 3.1.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Schema {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub nullable: Option<bool>,

    // Object properties
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, SchemaOrRef>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,

    #[serde(
        rename = "additionalProperties",
        skip_serializing_if = "Option::is_none"
    )]
    pub additional_properties: Option<AdditionalProperties>,

    // Array items
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaOrRef>>,

    // Composition
    #[serde(rename = "allOf", default, skip_serializing_if = "Vec::is_empty")]
    pub all_of: Vec<SchemaOrRef>,

    #[serde(rename = "oneOf", default, skip_serializing_if = "Vec::is_empty")]
    pub one_of: Vec<SchemaOrRef>,

    #[serde(rename = "anyOf", default, skip_serializing_if = "Vec::is_empty")]
    pub any_of: Vec<SchemaOrRef>,

    #[serde(rename = "enum", default, skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<serde_json::Value>,

    #[serde(rename = "const", skip_serializing_if = "Option::is_none")]
    pub const_value: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<serde_json::Value>,
}

/// `additionalProperties` can be a boolean or a schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AdditionalProperties {
    Bool(bool),
    Schema(Box<SchemaOrRef>),
}

/// Primitive schema kinds dispatched on by generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrimitiveType {
    String,
    Number,
    Integer,
    Boolean,
    Null,
}

/// Composition keyword carried by a schema, with its branches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Composite<'a> {
    AnyOf(&'a [SchemaOrRef]),
    OneOf(&'a [SchemaOrRef]),
    AllOf(&'a [SchemaOrRef]),
}

/// Structural classification of a concrete schema.
///
/// A schema that declares `items` is always `Array`, whatever its `type` says, so a
/// node is never both array-shaped and primitive-typed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SchemaShape<'a> {
    Array(&'a SchemaOrRef),
    Composite(Composite<'a>),
    Primitive(PrimitiveType),
    Object(&'a IndexMap<String, SchemaOrRef>),
    /// Nothing to dispatch on: no type, no properties, no composition.
    Opaque,
}

impl Schema {
    pub fn shape(&self) -> SchemaShape<'_> {
        if let Some(items) = &self.items {
            return SchemaShape::Array(items);
        }
        if !self.any_of.is_empty() {
            return SchemaShape::Composite(Composite::AnyOf(&self.any_of));
        }
        if !self.one_of.is_empty() {
            return SchemaShape::Composite(Composite::OneOf(&self.one_of));
        }
        if !self.all_of.is_empty() {
            return SchemaShape::Composite(Composite::AllOf(&self.all_of));
        }
        match self.primary_type() {
            Some(SchemaType::String) => SchemaShape::Primitive(PrimitiveType::String),
            Some(SchemaType::Number) => SchemaShape::Primitive(PrimitiveType::Number),
            Some(SchemaType::Integer) => SchemaShape::Primitive(PrimitiveType::Integer),
            Some(SchemaType::Boolean) => SchemaShape::Primitive(PrimitiveType::Boolean),
            Some(SchemaType::Null) => SchemaShape::Primitive(PrimitiveType::Null),
            Some(SchemaType::Object) => SchemaShape::Object(&self.properties),
            None if !self.properties.is_empty() => SchemaShape::Object(&self.properties),
            Some(SchemaType::Array) | None => SchemaShape::Opaque,
        }
    }

    /// Whether this schema declares `items`.
    pub fn is_array_shaped(&self) -> bool {
        self.items.is_some()
    }

    /// The declared type, ignoring a `"null"` member of a 3.1 type array.
    pub fn primary_type(&self) -> Option<SchemaType> {
        match self.schema_type.as_ref()? {
            TypeSet::Single(t) => Some(*t),
            TypeSet::Multiple(types) => types
                .iter()
                .copied()
                .find(|t| *t != SchemaType::Null)
                .or_else(|| types.first().copied()),
        }
    }

    /// `nullable: true` (3.0) or a type array with a `"null"` member next to another type (3.1).
    pub fn is_nullable(&self) -> bool {
        if self.nullable == Some(true) {
            return true;
        }
        match &self.schema_type {
            Some(TypeSet::Multiple(types)) => {
                types.len() > 1 && types.contains(&SchemaType::Null)
            }
            _ => false,
        }
    }

    pub fn is_required(&self, property: &str) -> bool {
        self.required.iter().any(|r| r == property)
    }
}
