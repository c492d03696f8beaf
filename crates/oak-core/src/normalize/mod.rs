//! Turns an input file (plus any files it references) into one self-contained document.
//!
//! This is the only stage allowed to fail: unreadable or unparseable inputs and missing
//! external targets are fatal. Everything downstream degrades instead of erroring.

mod bundle;
pub mod loader;

use std::path::Path;

use serde_json::Value;

pub use loader::{DocumentLoader, FsLoader, MemoryLoader};

use crate::error::NormalizeError;
use crate::parse::{self, operation::HttpMethod, spec::OpenApiDocument};
use crate::resolve::MAX_REF_HOPS;

/// Load, bundle and normalize the document at `entry`.
pub fn normalize(
    entry: &Path,
    loader: &dyn DocumentLoader,
) -> Result<OpenApiDocument, NormalizeError> {
    let root = loader.load(entry)?;
    let mut bundled = bundle::bundle(root, entry, loader)?;
    inline_parameter_refs(&mut bundled);

    let document = parse::from_value(bundled).map_err(|source| NormalizeError::Parse {
        path: entry.to_path_buf(),
        source,
    })?;
    log::debug!(
        "normalized {} (OpenAPI {}, {} paths)",
        entry.display(),
        document.openapi,
        document.paths.len()
    );
    Ok(document)
}

/// Normalize a document from disk.
pub fn normalize_file(entry: &Path) -> Result<OpenApiDocument, NormalizeError> {
    normalize(entry, &FsLoader)
}

/// Replace every `$ref` parameter on path items and operations with the object it
/// points at. Parameters whose target cannot be found are dropped.
fn inline_parameter_refs(document: &mut Value) {
    let snapshot = document.clone();
    let Some(paths) = document.get_mut("paths").and_then(Value::as_object_mut) else {
        return;
    };
    for (path, item) in paths.iter_mut() {
        if let Some(parameters) = item.get_mut("parameters") {
            inline_parameter_list(parameters, &snapshot, path);
        }
        for method in HttpMethod::ALL {
            if let Some(parameters) = item
                .get_mut(method.key())
                .and_then(|operation| operation.get_mut("parameters"))
            {
                inline_parameter_list(parameters, &snapshot, path);
            }
        }
    }
}

fn inline_parameter_list(parameters: &mut Value, document: &Value, path: &str) {
    let Some(list) = parameters.as_array_mut() else {
        return;
    };
    list.retain_mut(|parameter| {
        let Some(reference) = parameter.get("$ref").and_then(Value::as_str) else {
            return true;
        };
        let reference = reference.to_string();
        match lookup_parameter(document, &reference) {
            Some(resolved) => {
                *parameter = resolved.clone();
                true
            }
            None => {
                log::warn!("dropping unresolved parameter {reference} on {path}");
                false
            }
        }
    });
}

/// Structural lookup of a parameter reference, following reference chains.
fn lookup_parameter<'v>(document: &'v Value, reference: &str) -> Option<&'v Value> {
    let mut current = document.pointer(reference.strip_prefix('#')?)?;
    for _ in 0..MAX_REF_HOPS {
        match current.get("$ref").and_then(Value::as_str) {
            Some(next) => current = document.pointer(next.strip_prefix('#')?)?,
            None => return current.is_object().then_some(current),
        }
    }
    None
}
