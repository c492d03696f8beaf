//! Mock-Data strategy: one typed constant per operation and JSON response.

use std::collections::BTreeSet;

use oak_core::mock::{DEFAULT_CYCLE_LIMIT, DEFAULT_MAX_DEPTH};
use oak_core::naming::{status_suffix, status_type_name};
use oak_core::{EmitContext, Emitter, IndexedOperation, MockContext, MockSynthesizer, SourceLines};
use rand::SeedableRng;
use rand::rngs::StdRng;

/// Emits `mockData.ts`.
///
/// Every binding gets a fresh [`MockContext`]; the references that hit the cycle
/// limit anywhere in the artifact are reported once, after the last operation.
pub struct MockDataEmitter {
    rng: StdRng,
    cycle_limit: usize,
    exceeded: BTreeSet<String>,
}

impl MockDataEmitter {
    /// Seeded generation is reproducible; `None` draws the seed from OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            cycle_limit: DEFAULT_CYCLE_LIMIT,
            exceeded: BTreeSet::new(),
        }
    }

    pub fn with_cycle_limit(mut self, cycle_limit: usize) -> Self {
        self.cycle_limit = cycle_limit;
        self
    }

    /// References that passed the cycle limit so far.
    pub fn exceeded(&self) -> &BTreeSet<String> {
        &self.exceeded
    }
}

impl Default for MockDataEmitter {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Emitter for MockDataEmitter {
    fn file_name(&self) -> &'static str {
        "mockData.ts"
    }

    fn header(&mut self, ctx: &EmitContext<'_>, out: &mut SourceLines) {
        self.exceeded.clear();
        out.push(format!(
            "import type {{ Paths }} from \"{}\";",
            ctx.imports.type_definitions
        ));
        out.blank();
    }

    fn operation(&mut self, op: &IndexedOperation, ctx: &EmitContext<'_>, out: &mut SourceLines) {
        let mut synthesizer = MockSynthesizer::new(ctx.document, &mut self.rng);
        for (status, node) in op.json_responses() {
            let mut mock_ctx = MockContext::with_limit(self.cycle_limit);
            let value = synthesizer.synthesize(node, &mut mock_ctx);
            self.exceeded.extend(mock_ctx.into_exceeded());

            let type_name = &op.name.type_name;
            let binding = format!("{type_name}Response{}", status_suffix(status));
            let Some(value) = value else {
                log::warn!("no mock value for {binding}, skipping it");
                continue;
            };
            let literal = serde_json::to_string(&value).unwrap_or_else(|_| "null".to_string());
            out.push(format!(
                "export const {binding}: Paths.{type_name}.Responses.{} = {literal};",
                status_type_name(status)
            ));
        }
    }

    fn footer(&mut self, _ctx: &EmitContext<'_>, _out: &mut SourceLines) {
        if !self.exceeded.is_empty() {
            let refs: Vec<&str> = self.exceeded.iter().map(String::as_str).collect();
            log::error!(
                "mock generation hit the cycle limit of {} or the nesting limit of {} for: {}",
                self.cycle_limit,
                DEFAULT_MAX_DEPTH,
                refs.join(", ")
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oak_core::{ImportPaths, index_operations, parse};

    #[test]
    fn test_accumulates_exceeded_references() {
        let doc = parse::from_yaml(
            r##"
openapi: 3.0.0
info: { title: t, version: "1" }
paths:
  /node:
    get:
      operationId: getNode
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema: { $ref: '#/components/schemas/Node' }
components:
  schemas:
    Node:
      type: object
      properties:
        next: { $ref: '#/components/schemas/Node' }
"##,
        )
        .unwrap();
        let operations = index_operations(&doc);
        let imports = ImportPaths::default();
        let ctx = EmitContext {
            document: &doc,
            operations: &operations,
            imports: &imports,
        };
        let mut emitter = MockDataEmitter::new(Some(1)).with_cycle_limit(2);
        let text = emitter.emit(&ctx).into_text();

        assert!(emitter.exceeded().contains("#/components/schemas/Node"));
        assert!(text.contains(
            "export const GetNodeResponse200: Paths.GetNode.Responses.$200 = {\"next\":{}};"
        ));
    }
}
