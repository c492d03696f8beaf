pub mod emitters;
pub mod type_mapper;

pub use emitters::client::ApiClientEmitter;
pub use emitters::types::TypeDefinitionsEmitter;

use oak_core::IndexedOperation;
use oak_core::index::BodyEncoding;
use oak_core::naming::status_type_name;

/// The TypeScript type of an operation's successful payload, as named in the
/// `Paths` namespace: the first 2xx JSON response, else `default`, else `unknown`.
pub fn response_type(op: &IndexedOperation) -> String {
    match op.success_response() {
        Some((status, _)) => format!(
            "Paths.{}.Responses.{}",
            op.name.type_name,
            status_type_name(status)
        ),
        None => "unknown".to_string(),
    }
}

/// The TypeScript type callers pass as the request body. Multipart bodies are
/// built by the caller as `FormData` and sent unmodified.
pub fn request_body_type(op: &IndexedOperation) -> String {
    match &op.request_body {
        Some(body) if body.encoding == BodyEncoding::FormData => "FormData".to_string(),
        _ => format!("Paths.{}.RequestBody", op.name.type_name),
    }
}

/// Escape `*/` sequences that would prematurely close JSDoc comment blocks.
pub fn escape_jsdoc(value: String) -> String {
    value.replace("*/", "*\\/")
}
