//! Local `$ref` resolution over the typed document.
//!
//! Lookups walk the reference path one segment at a time. A missing segment yields
//! `None`; callers decide how loudly to report it.

use crate::parse::operation::HttpMethod;
use crate::parse::media_type::MediaType;
use crate::parse::parameter::ParameterOrRef;
use crate::parse::request_body::{RequestBody, RequestBodyOrRef};
use crate::parse::response::{Response, ResponseOrRef};
use crate::parse::schema::{AdditionalProperties, Schema, SchemaOrRef, SchemaShape};
use crate::parse::spec::OpenApiDocument;

/// Upper bound on `$ref` → `$ref` hops before a chain is treated as unresolvable.
pub const MAX_REF_HOPS: usize = 32;

/// Resolve a schema node to a concrete schema. Concrete nodes come back unchanged.
pub fn resolve<'a>(node: &'a SchemaOrRef, document: &'a OpenApiDocument) -> Option<&'a Schema> {
    let mut current = node;
    for _ in 0..=MAX_REF_HOPS {
        match current {
            SchemaOrRef::Schema(schema) => return Some(schema),
            SchemaOrRef::Ref { ref_path } => current = lookup_schema(ref_path, document)?,
        }
    }
    None
}

/// Resolve a node and classify the concrete schema it lands on.
pub fn classify<'a>(
    node: &'a SchemaOrRef,
    document: &'a OpenApiDocument,
) -> Option<SchemaShape<'a>> {
    resolve(node, document).map(Schema::shape)
}

/// Find the node a local reference points at, without following a reference found there.
pub fn lookup_schema<'a>(
    reference: &str,
    document: &'a OpenApiDocument,
) -> Option<&'a SchemaOrRef> {
    let segments = ref_segments(reference)?;
    let mut segments = segments.iter().map(String::as_str);

    let mut node = match segments.next()? {
        "components" => {
            let components = document.components.as_ref()?;
            match segments.next()? {
                "schemas" => components.schemas.get(segments.next()?)?,
                "parameters" => match components.parameters.get(segments.next()?)? {
                    ParameterOrRef::Parameter(parameter) => {
                        expect_segment(&mut segments, "schema")?;
                        parameter.schema.as_ref()?
                    }
                    ParameterOrRef::Ref { .. } => return None,
                },
                "requestBodies" => match components.request_bodies.get(segments.next()?)? {
                    RequestBodyOrRef::RequestBody(body) => {
                        media_schema(&body.content, &mut segments)?
                    }
                    RequestBodyOrRef::Ref { .. } => return None,
                },
                "responses" => match components.responses.get(segments.next()?)? {
                    ResponseOrRef::Response(response) => {
                        media_schema(&response.content, &mut segments)?
                    }
                    ResponseOrRef::Ref { .. } => return None,
                },
                _ => return None,
            }
        }
        "paths" => {
            let item = document.paths.get(segments.next()?)?;
            let method_key = segments.next()?;
            let method = HttpMethod::ALL
                .into_iter()
                .find(|m| m.key() == method_key)?;
            let operation = item.operation(method)?;
            match segments.next()? {
                "parameters" => {
                    let index: usize = segments.next()?.parse().ok()?;
                    let parameter = operation.parameters.get(index)?.as_parameter()?;
                    expect_segment(&mut segments, "schema")?;
                    parameter.schema.as_ref()?
                }
                "requestBody" => match operation.request_body.as_ref()? {
                    RequestBodyOrRef::RequestBody(body) => {
                        media_schema(&body.content, &mut segments)?
                    }
                    RequestBodyOrRef::Ref { .. } => return None,
                },
                "responses" => match operation.responses.get(segments.next()?)? {
                    ResponseOrRef::Response(response) => {
                        media_schema(&response.content, &mut segments)?
                    }
                    ResponseOrRef::Ref { .. } => return None,
                },
                _ => return None,
            }
        }
        _ => return None,
    };

    while let Some(segment) = segments.next() {
        let SchemaOrRef::Schema(schema) = node else {
            return None;
        };
        node = match segment {
            "properties" => schema.properties.get(segments.next()?)?,
            "items" => schema.items.as_deref()?,
            "additionalProperties" => match schema.additional_properties.as_ref()? {
                AdditionalProperties::Schema(inner) => inner,
                AdditionalProperties::Bool(_) => return None,
            },
            "allOf" => schema.all_of.get(segments.next()?.parse::<usize>().ok()?)?,
            "oneOf" => schema.one_of.get(segments.next()?.parse::<usize>().ok()?)?,
            "anyOf" => schema.any_of.get(segments.next()?.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    Some(node)
}

/// Resolve a request body, following `#/components/requestBodies/*` references.
pub fn resolve_request_body<'a>(
    node: &'a RequestBodyOrRef,
    document: &'a OpenApiDocument,
) -> Option<&'a RequestBody> {
    let mut current = node;
    for _ in 0..=MAX_REF_HOPS {
        match current {
            RequestBodyOrRef::RequestBody(body) => return Some(body),
            RequestBodyOrRef::Ref { ref_path } => {
                let name = component_name(ref_path, "requestBodies")?;
                current = document.components.as_ref()?.request_bodies.get(&name)?;
            }
        }
    }
    None
}

/// Resolve a response, following `#/components/responses/*` references.
pub fn resolve_response<'a>(
    node: &'a ResponseOrRef,
    document: &'a OpenApiDocument,
) -> Option<&'a Response> {
    let mut current = node;
    for _ in 0..=MAX_REF_HOPS {
        match current {
            ResponseOrRef::Response(response) => return Some(response),
            ResponseOrRef::Ref { ref_path } => {
                let name = component_name(ref_path, "responses")?;
                current = document.components.as_ref()?.responses.get(&name)?;
            }
        }
    }
    None
}

/// Split a local reference (`#/a/b~1c`) into unescaped segments (`["a", "b/c"]`).
/// Returns `None` for anything that is not a local JSON pointer.
pub fn ref_segments(reference: &str) -> Option<Vec<String>> {
    let pointer = reference.strip_prefix("#/")?;
    Some(
        pointer
            .split('/')
            .map(|segment| segment.replace("~1", "/").replace("~0", "~"))
            .collect(),
    )
}

/// The component name of a reference shaped exactly like `#/components/<section>/<name>`.
pub fn component_name(reference: &str, section: &str) -> Option<String> {
    match ref_segments(reference)?.as_slice() {
        [components, found, name] if components == "components" && found == section => {
            Some(name.clone())
        }
        _ => None,
    }
}

fn expect_segment<'s>(
    segments: &mut impl Iterator<Item = &'s str>,
    expected: &str,
) -> Option<()> {
    (segments.next()? == expected).then_some(())
}

fn media_schema<'a, 's>(
    content: &'a indexmap::IndexMap<String, MediaType>,
    segments: &mut impl Iterator<Item = &'s str>,
) -> Option<&'a SchemaOrRef> {
    expect_segment(segments, "content")?;
    let media = content.get(segments.next()?)?;
    expect_segment(segments, "schema")?;
    media.schema.as_ref()
}
