pub mod config;
pub mod emit;
pub mod error;
pub mod index;
pub mod mock;
pub mod naming;
pub mod normalize;
pub mod parse;
pub mod resolve;

pub use emit::{EmitContext, Emitter, ImportPaths, SourceLines};
pub use index::{IndexedOperation, index_operations};
pub use mock::{MockContext, MockSynthesizer};
pub use parse::spec::OpenApiDocument;
pub use resolve::resolve;

/// A generated file with path and content.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    pub path: String,
    pub content: String,
}
