use std::collections::HashSet;

use oak_core::emit::indent;
use oak_core::naming::{property_key, status_type_name, type_identifier, unique_identifier};
use oak_core::parse::parameter::{Parameter, ParameterLocation};
use oak_core::parse::schema::SchemaOrRef;
use oak_core::{EmitContext, Emitter, IndexedOperation, OpenApiDocument, SourceLines};

use crate::escape_jsdoc;
use crate::type_mapper::{TypeMapper, declaration};

/// Emits `typeDefinitions.ts`: the `Components` namespace with every component
/// schema, and the `Paths` namespace with one namespace per operation.
#[derive(Debug, Default)]
pub struct TypeDefinitionsEmitter;

impl Emitter for TypeDefinitionsEmitter {
    fn file_name(&self) -> &'static str {
        "typeDefinitions.ts"
    }

    fn header(&mut self, ctx: &EmitContext<'_>, out: &mut SourceLines) {
        out.push("/* eslint-disable */");
        out.push("export declare namespace Components {");
        out.push("    namespace Schemas {");
        for block in component_declarations(ctx.document) {
            out.push_block(&indent(&block, 2));
        }
        out.push("    }");
        out.push("}");
        out.push("export declare namespace Paths {");
    }

    fn operation(&mut self, op: &IndexedOperation, ctx: &EmitContext<'_>, out: &mut SourceLines) {
        out.push_block(&indent(&operation_namespace(op, ctx.document), 1));
    }

    fn footer(&mut self, _ctx: &EmitContext<'_>, out: &mut SourceLines) {
        out.push("}");
    }
}

fn component_declarations(document: &OpenApiDocument) -> Vec<String> {
    let Some(components) = &document.components else {
        return Vec::new();
    };
    let mapper = TypeMapper::new(document);
    components
        .schemas
        .iter()
        .map(|(name, node)| {
            let ty = mapper.map(node);
            let decl = declaration(&mapper.component_identifier(name), &ty);
            let description = match node {
                SchemaOrRef::Schema(schema) => schema.description.clone(),
                SchemaOrRef::Ref { .. } => None,
            };
            match description {
                Some(text) => format!("/** {} */\n{decl}", jsdoc_line(text)),
                None => decl,
            }
        })
        .collect()
}

fn operation_namespace(op: &IndexedOperation, document: &OpenApiDocument) -> String {
    let mut lines = Vec::new();
    if let Some(summary) = &op.summary {
        lines.push(format!("/** {} */", jsdoc_line(summary.clone())));
    }
    lines.push(format!("namespace {} {{", op.name.type_name));

    let mapper = TypeMapper::new(document);

    let params = emitted_parameters(op);
    if !params.is_empty() {
        lines.push("    namespace Parameters {".to_string());
        for (alias, param) in &params {
            let ty = mapper.map_optional(param.schema.as_ref());
            lines.push(format!("        export type {alias} = {ty};"));
        }
        lines.push("    }".to_string());
    }
    for (location, interface) in [
        (ParameterLocation::Path, "PathParameters"),
        (ParameterLocation::Query, "QueryParameters"),
    ] {
        let fields: Vec<String> = params
            .iter()
            .filter(|(_, p)| p.location == location)
            .map(|(alias, p)| {
                let optional = if p.is_required() { "" } else { "?" };
                format!("        {}{optional}: Parameters.{alias};", property_key(&p.name))
            })
            .collect();
        if !fields.is_empty() {
            lines.push(format!("    export interface {interface} {{"));
            lines.extend(fields);
            lines.push("    }".to_string());
        }
    }

    if let Some(body) = &op.request_body {
        let ty = mapper.map_optional(body.schema.as_ref());
        lines.push(indent(&declaration("RequestBody", &ty), 1));
    }

    let responses: Vec<String> = op
        .json_responses()
        .map(|(status, node)| {
            let ty = mapper.map(node);
            indent(&declaration(&status_type_name(status), &ty), 2)
        })
        .collect();
    if !responses.is_empty() {
        lines.push("    namespace Responses {".to_string());
        lines.extend(responses);
        lines.push("    }".to_string());
    }

    lines.push("}".to_string());
    lines.join("\n")
}

/// Path and query parameters with the alias each is declared under in the
/// `Parameters` namespace. Names that collapse to the same alias (`item-id` and
/// `itemId`) are numbered after the first one.
fn emitted_parameters(op: &IndexedOperation) -> Vec<(String, &Parameter)> {
    let mut taken = HashSet::new();
    op.parameters
        .iter()
        .filter(|p| matches!(p.location, ParameterLocation::Path | ParameterLocation::Query))
        .map(|p| (unique_identifier(type_identifier(&p.name), &mut taken), p))
        .collect()
}

fn jsdoc_line(text: String) -> String {
    escape_jsdoc(text).lines().collect::<Vec<_>>().join(" ")
}
