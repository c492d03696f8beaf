//! Hooks strategy: TanStack React Query bindings over the generated API client.

use minijinja::{Environment, context};
use oak_core::parse::operation::HttpMethod;
use oak_core::{EmitContext, Emitter, IndexedOperation, SourceLines};
use oak_typescript::{escape_jsdoc, request_body_type, response_type};

/// Emits `reactQuery.tsx`: an `APIClientProvider`, then per operation a query key
/// function and either `use…`/`useLazy…` queries (GET) or a `use…` mutation.
pub struct HooksEmitter {
    env: Environment<'static>,
}

impl HooksEmitter {
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.add_filter("escape_jsdoc", escape_jsdoc);
        env.add_template(
            "hooks_header.tsx.j2",
            include_str!("../templates/hooks_header.tsx.j2"),
        )
        .expect("template should be valid");
        env.add_template(
            "hooks_operation.tsx.j2",
            include_str!("../templates/hooks_operation.tsx.j2"),
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

impl Default for HooksEmitter {
    fn default() -> Self {
        Self::new()
    }
}

impl Emitter for HooksEmitter {
    fn file_name(&self) -> &'static str {
        "reactQuery.tsx"
    }

    fn header(&mut self, ctx: &EmitContext<'_>, out: &mut SourceLines) {
        let rendered = self.render(
            "hooks_header.tsx.j2",
            context! {
                type_definitions => ctx.imports.type_definitions.clone(),
                api_client => ctx.imports.api_client.clone(),
            },
        );
        out.push_block(&rendered);
        out.blank();
    }

    fn operation(&mut self, op: &IndexedOperation, _ctx: &EmitContext<'_>, out: &mut SourceLines) {
        let rendered = self.render("hooks_operation.tsx.j2", hook_context(op));
        out.push_block(&rendered);
        out.blank();
    }
}

fn hook_context(op: &IndexedOperation) -> minijinja::Value {
    let body = op.request_body.as_ref();
    let kind = if op.method == HttpMethod::Get {
        "query"
    } else {
        "mutation"
    };
    let variables_type = if op.has_inputs() {
        format!("{}Parameters", op.name.type_name)
    } else {
        "void".to_string()
    };

    context! {
        kind => kind,
        type_name => op.name.type_name.clone(),
        value_name => op.name.value_name.clone(),
        has_inputs => op.has_inputs(),
        has_path_params => op.has_path_params(),
        has_query_params => op.has_query_params(),
        has_body => body.is_some(),
        body_required => body.is_some_and(|b| b.required),
        body_type => request_body_type(op),
        response_type => response_type(op),
        variables_type => variables_type,
        summary => op.summary.clone().or_else(|| op.description.clone()),
    }
}
