//! Schema → TypeScript type mapping.

use std::collections::{HashMap, HashSet};
use std::fmt;

use oak_core::OpenApiDocument;
use oak_core::naming::{property_key, type_identifier, unique_identifier};
use oak_core::parse::schema::{
    AdditionalProperties, Composite, PrimitiveType, Schema, SchemaOrRef, SchemaShape, SchemaType,
};
use oak_core::resolve::{component_name, resolve};
use serde_json::Value;

/// Inline expansion depth for references that do not name a component.
const MAX_INLINE_DEPTH: usize = 16;

/// A TypeScript type expression.
#[derive(Debug, Clone, PartialEq)]
pub enum TsType {
    String,
    Number,
    Boolean,
    Null,
    Unknown,
    /// A literal type, already rendered (`"sold"`, `3`, `true`).
    Literal(String),
    /// A named type such as `Components.Schemas.Pet`.
    Named(String),
    Array(Box<TsType>),
    Record(Box<TsType>),
    Object {
        fields: Vec<TsField>,
        index: Option<Box<TsType>>,
    },
    Union(Vec<TsType>),
    Intersection(Vec<TsType>),
}

/// One property of an inline object type or interface.
#[derive(Debug, Clone, PartialEq)]
pub struct TsField {
    pub name: String,
    pub ty: TsType,
    pub required: bool,
}

impl TsType {
    /// `self | null`, flattening an existing union.
    pub fn or_null(self) -> TsType {
        match self {
            TsType::Null => TsType::Null,
            TsType::Union(mut variants) => {
                if !variants.contains(&TsType::Null) {
                    variants.push(TsType::Null);
                }
                TsType::Union(variants)
            }
            other => TsType::Union(vec![other, TsType::Null]),
        }
    }

    fn is_compound(&self) -> bool {
        matches!(self, TsType::Union(_) | TsType::Intersection(_))
    }
}

impl fmt::Display for TsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TsType::String => f.write_str("string"),
            TsType::Number => f.write_str("number"),
            TsType::Boolean => f.write_str("boolean"),
            TsType::Null => f.write_str("null"),
            TsType::Unknown => f.write_str("unknown"),
            TsType::Literal(literal) => f.write_str(literal),
            TsType::Named(name) => f.write_str(name),
            TsType::Array(inner) if inner.is_compound() => write!(f, "({inner})[]"),
            TsType::Array(inner) => write!(f, "{inner}[]"),
            TsType::Record(value) => write!(f, "Record<string, {value}>"),
            TsType::Object { fields, index } => {
                if fields.is_empty() && index.is_none() {
                    return f.write_str("{}");
                }
                let mut members: Vec<String> = fields.iter().map(TsField::to_string).collect();
                if let Some(index) = index {
                    members.push(format!("[key: string]: {index}"));
                }
                write!(f, "{{ {} }}", members.join("; "))
            }
            TsType::Union(variants) => {
                let parts: Vec<String> = variants.iter().map(ToString::to_string).collect();
                f.write_str(&parts.join(" | "))
            }
            TsType::Intersection(parts) => {
                let parts: Vec<String> = parts
                    .iter()
                    .map(|p| match p {
                        TsType::Union(_) => format!("({p})"),
                        _ => p.to_string(),
                    })
                    .collect();
                f.write_str(&parts.join(" & "))
            }
        }
    }
}

impl fmt::Display for TsField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let optional = if self.required { "" } else { "?" };
        write!(f, "{}{optional}: {}", property_key(&self.name), self.ty)
    }
}

/// Maps schema nodes of one document to TypeScript types.
///
/// Component schemas whose names collapse to the same identifier (`pet` and `Pet`)
/// are told apart by a numeric suffix, in component order, so declarations and
/// references always agree.
pub struct TypeMapper<'a> {
    document: &'a OpenApiDocument,
    component_identifiers: HashMap<&'a str, String>,
}

impl<'a> TypeMapper<'a> {
    pub fn new(document: &'a OpenApiDocument) -> Self {
        let mut taken = HashSet::new();
        let mut component_identifiers = HashMap::new();
        for name in document.components.iter().flat_map(|c| c.schemas.keys()) {
            let identifier = unique_identifier(type_identifier(name), &mut taken);
            if identifier != type_identifier(name) {
                log::warn!(
                    "component schema {name} clashes with another schema, exporting it as {identifier}"
                );
            }
            component_identifiers.insert(name.as_str(), identifier);
        }
        Self {
            document,
            component_identifiers,
        }
    }

    /// The identifier a component schema is declared under in `Components.Schemas`.
    pub fn component_identifier(&self, name: &str) -> String {
        self.component_identifiers
            .get(name)
            .cloned()
            .unwrap_or_else(|| type_identifier(name))
    }

    /// The namespaced name a `#/components/schemas/<name>` reference is exported under.
    pub fn component_type_name(&self, name: &str) -> String {
        format!("Components.Schemas.{}", self.component_identifier(name))
    }

    /// Map a schema node. Unresolvable references become `unknown`.
    pub fn map(&self, node: &SchemaOrRef) -> TsType {
        self.map_node(node, 0)
    }

    /// Map an optional schema, treating an absent one as `unknown`.
    pub fn map_optional(&self, node: Option<&SchemaOrRef>) -> TsType {
        node.map_or(TsType::Unknown, |node| self.map(node))
    }

    fn map_node(&self, node: &SchemaOrRef, depth: usize) -> TsType {
        match node {
            SchemaOrRef::Schema(schema) => self.map_schema(schema, depth),
            SchemaOrRef::Ref { ref_path } => {
                let Some(schema) = resolve(node, self.document) else {
                    log::warn!("could not resolve {ref_path}, typing it as unknown");
                    return TsType::Unknown;
                };
                if let Some(name) = component_name(ref_path, "schemas") {
                    return TsType::Named(self.component_type_name(&name));
                }
                if depth >= MAX_INLINE_DEPTH {
                    log::warn!("{ref_path} nests too deeply to inline, typing it as unknown");
                    return TsType::Unknown;
                }
                self.map_schema(schema, depth + 1)
            }
        }
    }

    fn map_schema(&self, schema: &Schema, depth: usize) -> TsType {
        let base = if let Some(value) = &schema.const_value {
            literal(value)
        } else if !schema.enum_values.is_empty() {
            TsType::Union(schema.enum_values.iter().map(literal).collect())
        } else {
            self.map_shape(schema, depth)
        };

        if schema.is_nullable() {
            base.or_null()
        } else {
            base
        }
    }

    fn map_shape(&self, schema: &Schema, depth: usize) -> TsType {
        match schema.shape() {
            SchemaShape::Array(items) => TsType::Array(Box::new(self.map_node(items, depth))),
            SchemaShape::Composite(Composite::AllOf(branches)) => {
                TsType::Intersection(self.map_all(branches, depth))
            }
            SchemaShape::Composite(Composite::AnyOf(branches) | Composite::OneOf(branches)) => {
                TsType::Union(self.map_all(branches, depth))
            }
            SchemaShape::Primitive(primitive) => match primitive {
                PrimitiveType::String => TsType::String,
                PrimitiveType::Number | PrimitiveType::Integer => TsType::Number,
                PrimitiveType::Boolean => TsType::Boolean,
                PrimitiveType::Null => TsType::Null,
            },
            SchemaShape::Object(_) => self.map_object(schema, depth),
            SchemaShape::Opaque => match schema.primary_type() {
                Some(SchemaType::Array) => TsType::Array(Box::new(TsType::Unknown)),
                _ => TsType::Unknown,
            },
        }
    }

    fn map_all(&self, branches: &[SchemaOrRef], depth: usize) -> Vec<TsType> {
        branches
            .iter()
            .map(|branch| self.map_node(branch, depth))
            .collect()
    }

    fn map_object(&self, schema: &Schema, depth: usize) -> TsType {
        let fields: Vec<TsField> = schema
            .properties
            .iter()
            .map(|(name, property)| TsField {
                name: name.clone(),
                ty: self.map_node(property, depth),
                required: schema.is_required(name),
            })
            .collect();

        let additional = match &schema.additional_properties {
            Some(AdditionalProperties::Bool(true)) => Some(TsType::Unknown),
            Some(AdditionalProperties::Schema(node)) => Some(self.map_node(node, depth)),
            Some(AdditionalProperties::Bool(false)) | None => None,
        };

        match additional {
            None if fields.is_empty() => TsType::Record(Box::new(TsType::Unknown)),
            Some(value) if fields.is_empty() => TsType::Record(Box::new(value)),
            // Declared properties must stay assignable to the index signature.
            Some(_) => TsType::Object {
                fields,
                index: Some(Box::new(TsType::Unknown)),
            },
            None => TsType::Object {
                fields,
                index: None,
            },
        }
    }
}

fn literal(value: &Value) -> TsType {
    match value {
        Value::Null => TsType::Null,
        Value::String(_) | Value::Number(_) | Value::Bool(_) => TsType::Literal(value.to_string()),
        Value::Array(_) | Value::Object(_) => TsType::Unknown,
    }
}

/// Render `ty` as an exported declaration named `name`: an interface for plain
/// object types, a type alias otherwise.
pub fn declaration(name: &str, ty: &TsType) -> String {
    match ty {
        TsType::Object { fields, index } if !fields.is_empty() => {
            let mut lines = vec![format!("export interface {name} {{")];
            lines.extend(fields.iter().map(|field| format!("    {field};")));
            if let Some(index) = index {
                lines.push(format!("    [key: string]: {index};"));
            }
            lines.push("}".to_string());
            lines.join("\n")
        }
        _ => format!("export type {name} = {ty};"),
    }
}
