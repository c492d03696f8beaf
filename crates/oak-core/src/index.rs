//! Deterministic enumeration of the operations in a normalized document.

use std::collections::HashSet;

use serde::Serialize;

use crate::naming::OperationName;
use crate::parse::media_type::{is_form_data_content_type, is_json_content_type};
use crate::parse::operation::{HttpMethod, Operation, PathItem};
use crate::parse::parameter::{Parameter, ParameterLocation};
use crate::parse::response::Response;
use crate::parse::schema::SchemaOrRef;
use crate::parse::spec::OpenApiDocument;
use crate::resolve::{resolve_request_body, resolve_response};

/// How a request body is sent over the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyEncoding {
    Json,
    FormData,
    Other,
}

/// The request body chosen for an operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedRequestBody {
    pub content_type: String,
    pub encoding: BodyEncoding,
    pub schema: Option<SchemaOrRef>,
    pub required: bool,
}

/// A response keyed by its status code (or `default`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedResponse {
    pub status: String,
    pub response: Response,
}

impl IndexedResponse {
    pub fn json_schema(&self) -> Option<&SchemaOrRef> {
        self.response.json_schema()
    }

    pub fn is_success(&self) -> bool {
        self.status.starts_with('2')
    }
}

/// One (path, method) pair that carries an `operationId`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexedOperation {
    pub path: String,
    pub method: HttpMethod,
    pub name: OperationName,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
    /// Path-level parameters merged with the operation's own; the operation wins on
    /// a (name, location) clash.
    pub parameters: Vec<Parameter>,
    pub request_body: Option<IndexedRequestBody>,
    pub responses: Vec<IndexedResponse>,
}

impl IndexedOperation {
    pub fn operation_id(&self) -> &str {
        &self.name.original
    }

    pub fn parameters_in(&self, location: ParameterLocation) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(move |p| p.location == location)
    }

    pub fn has_path_params(&self) -> bool {
        self.parameters_in(ParameterLocation::Path).next().is_some()
    }

    pub fn has_query_params(&self) -> bool {
        self.parameters_in(ParameterLocation::Query).next().is_some()
    }

    pub fn has_body(&self) -> bool {
        self.request_body.is_some()
    }

    /// Whether the generated callable takes any input at all.
    pub fn has_inputs(&self) -> bool {
        self.has_path_params() || self.has_query_params() || self.has_body()
    }

    /// Responses that carry a JSON schema, in document order.
    pub fn json_responses(&self) -> impl Iterator<Item = (&str, &SchemaOrRef)> {
        self.responses
            .iter()
            .filter_map(|r| r.json_schema().map(|schema| (r.status.as_str(), schema)))
    }

    /// The first 2xx response with a JSON schema, falling back to `default`.
    pub fn success_response(&self) -> Option<(&str, &SchemaOrRef)> {
        self.json_responses()
            .find(|(status, _)| status.starts_with('2'))
            .or_else(|| self.json_responses().find(|(status, _)| *status == "default"))
    }
}

/// Enumerate operations: paths in document order, then methods in canonical order.
/// Entries without an `operationId` are skipped.
pub fn index_operations(document: &OpenApiDocument) -> Vec<IndexedOperation> {
    let mut seen = HashSet::new();
    let mut operations = Vec::new();

    for (path, item) in &document.paths {
        for (method, operation) in item.operations() {
            let Some(operation_id) = operation.operation_id.as_deref() else {
                log::debug!("skipping {} {path}: no operationId", method.as_str());
                continue;
            };
            if !seen.insert(operation_id.to_string()) {
                log::warn!("duplicate operationId {operation_id} on {} {path}", method.as_str());
            }
            operations.push(index_operation(document, path, item, method, operation, operation_id));
        }
    }

    log::debug!("indexed {} operations", operations.len());
    operations
}

fn index_operation(
    document: &OpenApiDocument,
    path: &str,
    item: &PathItem,
    method: HttpMethod,
    operation: &Operation,
    operation_id: &str,
) -> IndexedOperation {
    IndexedOperation {
        path: path.to_string(),
        method,
        name: OperationName::from_operation_id(operation_id),
        summary: operation.summary.clone(),
        description: operation.description.clone(),
        deprecated: operation.deprecated.unwrap_or(false),
        parameters: merge_parameters(item, operation),
        request_body: index_request_body(document, operation, operation_id),
        responses: index_responses(document, operation, operation_id),
    }
}

fn merge_parameters(item: &PathItem, operation: &Operation) -> Vec<Parameter> {
    let own: Vec<&Parameter> = operation
        .parameters
        .iter()
        .filter_map(|p| p.as_parameter())
        .collect();

    let mut merged: Vec<Parameter> = item
        .parameters
        .iter()
        .filter_map(|p| p.as_parameter())
        .filter(|shared| {
            !own.iter()
                .any(|p| p.name == shared.name && p.location == shared.location)
        })
        .cloned()
        .collect();
    merged.extend(own.into_iter().cloned());
    merged
}

fn index_request_body(
    document: &OpenApiDocument,
    operation: &Operation,
    operation_id: &str,
) -> Option<IndexedRequestBody> {
    let node = operation.request_body.as_ref()?;
    let Some(body) = resolve_request_body(node, document) else {
        log::warn!("could not resolve request body for {operation_id}");
        return None;
    };

    let (content_type, media) = body.preferred_content()?;

    let encoding = if is_json_content_type(content_type) {
        BodyEncoding::Json
    } else if is_form_data_content_type(content_type) {
        BodyEncoding::FormData
    } else {
        BodyEncoding::Other
    };

    Some(IndexedRequestBody {
        content_type: content_type.to_string(),
        encoding,
        schema: media.schema.clone(),
        required: body.required,
    })
}

fn index_responses(
    document: &OpenApiDocument,
    operation: &Operation,
    operation_id: &str,
) -> Vec<IndexedResponse> {
    operation
        .responses
        .iter()
        .filter_map(|(status, node)| match resolve_response(node, document) {
            Some(response) => Some(IndexedResponse {
                status: status.clone(),
                response: response.clone(),
            }),
            None => {
                log::warn!("could not resolve {status} response for {operation_id}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn index(yaml: &str) -> Vec<IndexedOperation> {
        index_operations(&parse::from_yaml(yaml).unwrap())
    }

    #[test]
    fn test_canonical_method_order() {
        let ops = index(
            r#"
openapi: 3.0.0
info: { title: t, version: "1" }
paths:
  /a:
    trace: { operationId: traceA, responses: {} }
    post: { operationId: createA, responses: {} }
    get: { operationId: listA, responses: {} }
    delete: { operationId: deleteA, responses: {} }
"#,
        );
        let ids: Vec<&str> = ops.iter().map(|o| o.operation_id()).collect();
        assert_eq!(ids, vec!["listA", "createA", "deleteA", "traceA"]);
    }

    #[test]
    fn test_operation_level_parameter_overrides_path_level() {
        let ops = index(
            r#"
openapi: 3.0.0
info: { title: t, version: "1" }
paths:
  /pets/{id}:
    parameters:
      - { name: id, in: path, required: true, schema: { type: string } }
      - { name: verbose, in: query, schema: { type: boolean } }
    get:
      operationId: getPet
      parameters:
        - { name: id, in: path, required: true, schema: { type: integer } }
      responses: {}
"#,
        );
        let params = &ops[0].parameters;
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "verbose");
        assert_eq!(params[1].name, "id");
        assert!(ops[0].has_path_params());
        assert!(ops[0].has_query_params());
        assert!(!ops[0].has_body());
    }

    #[test]
    fn test_request_body_prefers_json() {
        let ops = index(
            r#"
openapi: 3.0.0
info: { title: t, version: "1" }
paths:
  /upload:
    post:
      operationId: upload
      requestBody:
        content:
          multipart/form-data:
            schema: { type: object }
      responses: {}
    put:
      operationId: replace
      requestBody:
        $ref: '#/components/requestBodies/Doc'
      responses: {}
components:
  requestBodies:
    Doc:
      required: true
      content:
        text/plain:
          schema: { type: string }
        application/json:
          schema: { type: object }
"#,
        );
        let upload = ops.iter().find(|o| o.operation_id() == "upload").unwrap();
        let body = upload.request_body.as_ref().unwrap();
        assert_eq!(body.encoding, BodyEncoding::FormData);

        let replace = ops.iter().find(|o| o.operation_id() == "replace").unwrap();
        let body = replace.request_body.as_ref().unwrap();
        assert_eq!(body.content_type, "application/json");
        assert_eq!(body.encoding, BodyEncoding::Json);
        assert!(body.required);
    }

    #[test]
    fn test_success_response_selection() {
        let ops = index(
            r#"
openapi: 3.0.0
info: { title: t, version: "1" }
paths:
  /a:
    get:
      operationId: getA
      responses:
        default:
          description: err
          content:
            application/json:
              schema: { type: object }
        "204":
          description: empty
        "201":
          description: created
          content:
            application/json:
              schema: { type: string }
        "404":
          $ref: '#/components/responses/Missing'
"#,
        );
        let op = &ops[0];
        assert_eq!(op.responses.len(), 3, "unresolvable response is dropped");
        let statuses: Vec<&str> = op.json_responses().map(|(s, _)| s).collect();
        assert_eq!(statuses, vec!["default", "201"]);
        assert_eq!(op.success_response().map(|(s, _)| s), Some("201"));
    }
}
