//! The line-sequence contract every generator strategy implements.

use crate::GeneratedFile;
use crate::index::IndexedOperation;
use crate::parse::spec::OpenApiDocument;

/// Append-only sequence of source lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLines {
    lines: Vec<String>,
}

impl SourceLines {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn blank(&mut self) {
        self.lines.push(String::new());
    }

    /// Append every line of a multi-line block (for example a rendered template).
    pub fn push_block(&mut self, block: &str) {
        self.lines.extend(block.lines().map(str::to_string));
    }

    pub fn append(&mut self, other: SourceLines) {
        self.lines.extend(other.lines);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Join into file content with a trailing newline.
    pub fn into_text(self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

impl Extend<String> for SourceLines {
    fn extend<T: IntoIterator<Item = String>>(&mut self, iter: T) {
        self.lines.extend(iter);
    }
}

/// Module specifiers the generated artifacts use to import each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportPaths {
    pub type_definitions: String,
    pub api_client: String,
}

impl Default for ImportPaths {
    fn default() -> Self {
        Self {
            type_definitions: "./typeDefinitions".to_string(),
            api_client: "./apiClient".to_string(),
        }
    }
}

/// Everything a strategy reads. Shared, immutable.
#[derive(Debug, Clone, Copy)]
pub struct EmitContext<'a> {
    pub document: &'a OpenApiDocument,
    pub operations: &'a [IndexedOperation],
    pub imports: &'a ImportPaths,
}

/// A generator strategy: a header, one block per indexed operation, a footer.
pub trait Emitter {
    /// Default file name of the artifact this strategy produces.
    fn file_name(&self) -> &'static str;

    fn header(&mut self, ctx: &EmitContext<'_>, out: &mut SourceLines);

    fn operation(&mut self, op: &IndexedOperation, ctx: &EmitContext<'_>, out: &mut SourceLines);

    fn footer(&mut self, _ctx: &EmitContext<'_>, _out: &mut SourceLines) {}

    /// Run header, every operation in index order, then footer.
    fn emit(&mut self, ctx: &EmitContext<'_>) -> SourceLines {
        let mut out = SourceLines::new();
        self.header(ctx, &mut out);
        for op in ctx.operations {
            self.operation(op, ctx, &mut out);
        }
        self.footer(ctx, &mut out);
        out
    }

    /// Emit and package as a file at `path`.
    fn generate(&mut self, ctx: &EmitContext<'_>, path: &str) -> GeneratedFile {
        GeneratedFile {
            path: path.to_string(),
            content: self.emit(ctx).into_text(),
        }
    }
}

/// Indent every non-empty line of `block` by `depth` levels of four spaces.
pub fn indent(block: &str, depth: usize) -> String {
    let pad = "    ".repeat(depth);
    block
        .lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
