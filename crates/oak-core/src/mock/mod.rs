//! Schema-driven mock value synthesis.
//!
//! [`MockSynthesizer::synthesize`] never fails. `None` means "omit this field or
//! branch": the reference could not be resolved, a composite had nothing to pick
//! from, or a reference passed the cycle or nesting limit of the [`MockContext`].

mod context;
pub mod faker;

use indexmap::IndexMap;
use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::{Map, Value};

pub use context::{DEFAULT_CYCLE_LIMIT, DEFAULT_MAX_DEPTH, MockContext};

use crate::parse::schema::{
    Composite, PrimitiveType, Schema, SchemaOrRef, SchemaShape, SchemaType,
};
use crate::parse::spec::OpenApiDocument;
use crate::resolve::resolve;

/// Turns schemas of one document into example values.
///
/// Randomness comes from the injected `rng`; a seeded generator gives reproducible
/// output for the same document.
pub struct MockSynthesizer<'a, R> {
    document: &'a OpenApiDocument,
    rng: R,
}

impl<'a, R: Rng> MockSynthesizer<'a, R> {
    pub fn new(document: &'a OpenApiDocument, rng: R) -> Self {
        Self { document, rng }
    }

    /// Synthesize a value for a schema node, tracking references in `ctx`.
    pub fn synthesize(&mut self, node: &SchemaOrRef, ctx: &mut MockContext) -> Option<Value> {
        let ref_path = match node {
            SchemaOrRef::Schema(schema) => return self.synthesize_schema(schema, ctx),
            SchemaOrRef::Ref { ref_path } => ref_path,
        };
        if !ctx.enter(ref_path) {
            log::debug!("cycle limit reached for {ref_path}");
            return None;
        }
        let Some(schema) = resolve(node, self.document) else {
            log::warn!("could not resolve {ref_path}");
            return None;
        };
        if !ctx.descend(ref_path) {
            log::debug!("nesting limit reached at {ref_path}");
            return None;
        }
        let value = self.synthesize_schema(schema, ctx);
        ctx.ascend();
        value
    }

    fn synthesize_schema(&mut self, schema: &Schema, ctx: &mut MockContext) -> Option<Value> {
        if let Some(example) = &schema.example {
            return Some(example.clone());
        }

        match schema.shape() {
            SchemaShape::Array(items) => self.synthesize_array(items, ctx),
            _ if schema.is_nullable() && self.rng.gen_bool(0.5) => Some(Value::Null),
            SchemaShape::Composite(composite) => self.synthesize_composite(composite, ctx),
            SchemaShape::Primitive(primitive) => Some(self.synthesize_primitive(schema, primitive)),
            SchemaShape::Object(properties) => Some(self.synthesize_object(properties, ctx)),
            SchemaShape::Opaque => Some(match schema.primary_type() {
                Some(SchemaType::Array) => Value::Array(Vec::new()),
                _ => Value::Object(Map::new()),
            }),
        }
    }

    /// One or two items. Items that yield nothing are kept as `null` so the length holds.
    fn synthesize_array(&mut self, items: &SchemaOrRef, ctx: &mut MockContext) -> Option<Value> {
        if resolve(items, self.document).is_none() {
            log::warn!(
                "could not resolve array items {}",
                items.ref_path().unwrap_or("<inline>")
            );
            return None;
        }
        let count = self.rng.gen_range(1..=2);
        let values = (0..count)
            .map(|_| self.synthesize(items, ctx).unwrap_or(Value::Null))
            .collect();
        Some(Value::Array(values))
    }

    fn synthesize_composite(
        &mut self,
        composite: Composite<'_>,
        ctx: &mut MockContext,
    ) -> Option<Value> {
        match composite {
            Composite::AnyOf(branches) | Composite::OneOf(branches) => {
                let candidates: Vec<&SchemaOrRef> =
                    branches.iter().filter(|branch| !branch.is_ref()).collect();
                let choice = *candidates.choose(&mut self.rng)?;
                self.synthesize(choice, ctx)
            }
            Composite::AllOf(branches) => {
                let values = branches
                    .iter()
                    .map(|branch| self.synthesize(branch, ctx).unwrap_or(Value::Null))
                    .collect();
                Some(Value::Array(values))
            }
        }
    }

    fn synthesize_primitive(&mut self, schema: &Schema, primitive: PrimitiveType) -> Value {
        if let Some(value) = &schema.const_value {
            return value.clone();
        }
        if let Some(value) = schema.enum_values.choose(&mut self.rng) {
            return value.clone();
        }

        let rng = &mut self.rng;
        let format = schema.format.as_deref();
        match primitive {
            PrimitiveType::String => Value::String(match format {
                Some("uuid") => faker::uuid(rng),
                Some("uri") => faker::uri(rng),
                Some("date") => faker::date(rng),
                Some("date-time" | "datetime") => faker::date_time(rng),
                Some("ipv4") => faker::ipv4(rng),
                Some("ipv6") => faker::ipv6(rng),
                Some("email") => faker::email(rng),
                Some("binary") => faker::binary(rng),
                _ => faker::word(rng),
            }),
            PrimitiveType::Integer => faker::integer(rng),
            PrimitiveType::Number => match format {
                Some("int32" | "int64") => faker::integer(rng),
                _ => faker::float(rng),
            },
            PrimitiveType::Boolean => faker::boolean(rng),
            PrimitiveType::Null => Value::Null,
        }
    }

    /// Declared properties only; properties that yield nothing are left out.
    fn synthesize_object(
        &mut self,
        properties: &IndexMap<String, SchemaOrRef>,
        ctx: &mut MockContext,
    ) -> Value {
        let mut object = Map::new();
        for (name, property) in properties {
            if let Some(value) = self.synthesize(property, ctx) {
                object.insert(name.clone(), value);
            }
        }
        Value::Object(object)
    }
}
