use minijinja::{Environment, context};
use oak_core::index::BodyEncoding;
use oak_core::{EmitContext, Emitter, IndexedOperation, SourceLines};

use crate::{escape_jsdoc, request_body_type, response_type};

/// Emits `apiClient.ts`: one `fetch`-based callable per operation, bound together by
/// `getAPIClient(config)`.
pub struct ApiClientEmitter {
    env: Environment<'static>,
}

impl ApiClientEmitter {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.add_filter("escape_jsdoc", escape_jsdoc);
        env.add_template(
            "api_client_header.ts.j2",
            include_str!("../../templates/api_client_header.ts.j2"),
        )
        .expect("template should be valid");
        env.add_template(
            "api_client_operation.ts.j2",
            include_str!("../../templates/api_client_operation.ts.j2"),
        )
        .expect("template should be valid");
        Self { env }
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> String {
        self.env
            .get_template(name)
            .and_then(|tmpl| tmpl.render(ctx))
            .expect("render should succeed")
    }
}

impl Default for ApiClientEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter for ApiClientEmitter {
    fn file_name(&self) -> &'static str {
        "apiClient.ts"
    }

    fn header(&mut self, ctx: &EmitContext<'_>, out: &mut SourceLines) {
        let rendered = self.render(
            "api_client_header.ts.j2",
            context! { type_definitions => ctx.imports.type_definitions.clone() },
        );
        out.push_block(&rendered);
        out.blank();
    }

    fn operation(&mut self, op: &IndexedOperation, _ctx: &EmitContext<'_>, out: &mut SourceLines) {
        let rendered = self.render("api_client_operation.ts.j2", operation_context(op));
        out.push_block(&rendered);
        out.blank();
    }

    fn footer(&mut self, ctx: &EmitContext<'_>, out: &mut SourceLines) {
        out.push("export const getAPIClient = (config: APIClientConfig) => ({");
        for op in ctx.operations {
            out.push(format!("    {name}: {name}(config),", name = op.name.value_name));
        }
        out.push("});");
        out.blank();
        out.push("export type APIClient = ReturnType<typeof getAPIClient>;");
    }
}

fn operation_context(op: &IndexedOperation) -> minijinja::Value {
    let body = op.request_body.as_ref();
    let form_data = body.is_some_and(|b| b.encoding == BodyEncoding::FormData);
    let path_literal =
        serde_json::to_string(&op.path).unwrap_or_else(|_| format!("\"{}\"", op.path));

    context! {
        type_name => op.name.type_name.clone(),
        value_name => op.name.value_name.clone(),
        http_method => op.method.as_str(),
        path_literal => path_literal,
        has_inputs => op.has_inputs(),
        has_path_params => op.has_path_params(),
        has_query_params => op.has_query_params(),
        has_body => body.is_some(),
        body_required => body.is_some_and(|b| b.required),
        body_type => request_body_type(op),
        form_data => form_data,
        response_type => response_type(op),
        summary => op.summary.clone(),
        deprecated => op.deprecated,
    }
}
