pub mod media_type;
pub mod operation;
pub mod parameter;
pub mod request_body;
pub mod response;
pub mod schema;
pub mod spec;

use serde_json::Value;

use crate::error::ParseError;
use spec::OpenApiDocument;

/// Parse YAML text into an untyped JSON tree.
pub fn value_from_yaml(input: &str) -> Result<Value, ParseError> {
    Ok(serde_yaml_ng::from_str(input)?)
}

/// Parse JSON text into an untyped JSON tree.
pub fn value_from_json(input: &str) -> Result<Value, ParseError> {
    Ok(serde_json::from_str(input)?)
}

/// Build the typed document from an already bundled JSON tree.
pub fn from_value(value: Value) -> Result<OpenApiDocument, ParseError> {
    validate_version(&value)?;
    Ok(serde_json::from_value(value)?)
}

/// Parse a self-contained OpenAPI document from YAML.
pub fn from_yaml(input: &str) -> Result<OpenApiDocument, ParseError> {
    from_value(value_from_yaml(input)?)
}

/// Parse a self-contained OpenAPI document from JSON.
pub fn from_json(input: &str) -> Result<OpenApiDocument, ParseError> {
    from_value(value_from_json(input)?)
}

fn validate_version(value: &Value) -> Result<(), ParseError> {
    let version = value
        .get("openapi")
        .and_then(Value::as_str)
        .ok_or_else(|| ParseError::MissingField("openapi".to_string()))?;
    if !version.starts_with("3.") {
        return Err(ParseError::UnsupportedVersion(version.to_string()));
    }
    Ok(())
}
