use std::path::Path;

use oak_core::normalize::{self, MemoryLoader};
use oak_core::{EmitContext, Emitter, ImportPaths, OpenApiDocument, index_operations};
use oak_typescript::{ApiClientEmitter, TypeDefinitionsEmitter};
use pretty_assertions::assert_eq;

const PETSTORE: &str = include_str!("../../oak-core/tests/fixtures/petstore.yaml");
const RECURSIVE: &str = include_str!("../../oak-core/tests/fixtures/recursive.yaml");

fn load(name: &str, content: &str) -> OpenApiDocument {
    let loader = MemoryLoader::new().with_document(name, content);
    normalize::normalize(Path::new(name), &loader).unwrap()
}

fn emit(emitter: &mut dyn Emitter, doc: &OpenApiDocument, imports: &ImportPaths) -> String {
    let operations = index_operations(doc);
    let ctx = EmitContext {
        document: doc,
        operations: &operations,
        imports,
    };
    emitter.emit(&ctx).into_text()
}

/// Lines from `first` up to and including the next line equal to `last`.
fn block(text: &str, first: &str, last: &str) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines
        .iter()
        .position(|l| *l == first)
        .unwrap_or_else(|| panic!("{first:?} not found in:\n{text}"));
    let end = lines[start..]
        .iter()
        .position(|l| *l == last)
        .map(|offset| start + offset)
        .unwrap_or_else(|| panic!("{last:?} not found after {first:?}"));
    lines[start..=end].join("\n")
}

fn type_definitions(doc: &OpenApiDocument) -> String {
    emit(&mut TypeDefinitionsEmitter, doc, &ImportPaths::default())
}

fn api_client(doc: &OpenApiDocument) -> String {
    emit(&mut ApiClientEmitter::new(), doc, &ImportPaths::default())
}

#[test]
fn test_components_namespace() {
    let text = type_definitions(&load("petstore.yaml", PETSTORE));
    assert!(text.starts_with("/* eslint-disable */\nexport declare namespace Components {\n"));
    assert_eq!(
        block(&text, "        export interface Pet {", "        }"),
        [
            "        export interface Pet {",
            "            id: number;",
            "            name: string;",
            "            tag?: string | null;",
            "            status?: \"available\" | \"pending\" | \"sold\";",
            "        }",
        ]
        .join("\n")
    );
    assert!(text.contains("export declare namespace Paths {"));
    assert!(text.ends_with("}\n"));
}

#[test]
fn test_operation_namespace() {
    let text = type_definitions(&load("petstore.yaml", PETSTORE));
    assert_eq!(
        block(&text, "    namespace ListPets {", "    }"),
        [
            "    namespace ListPets {",
            "        namespace Parameters {",
            "            export type Owner = string;",
            "            export type Limit = number;",
            "        }",
            "        export interface PathParameters {",
            "            owner: Parameters.Owner;",
            "        }",
            "        export interface QueryParameters {",
            "            limit?: Parameters.Limit;",
            "        }",
            "        namespace Responses {",
            "            export type $200 = Components.Schemas.Pet[];",
            "            export type Default = Components.Schemas.Error;",
            "        }",
            "    }",
        ]
        .join("\n")
    );
    assert!(text.contains("    /** List the pets of an owner */\n    namespace ListPets {"));
}

#[test]
fn test_operation_without_inputs_or_json_responses() {
    let text = type_definitions(&load("petstore.yaml", PETSTORE));
    assert!(text.contains("    namespace GetHealth {\n    }\n"));
}

#[test]
fn test_request_bodies_are_typed() {
    let text = type_definitions(&load("petstore.yaml", PETSTORE));
    assert!(text.contains("        export type RequestBody = Components.Schemas.NewPet;"));
    assert_eq!(
        block(&text, "        export interface RequestBody {", "        }"),
        "        export interface RequestBody {\n            file?: string;\n        }"
    );
}

#[test]
fn test_recursive_components() {
    let text = type_definitions(&load("recursive.yaml", RECURSIVE));
    assert!(text.contains("            next?: Components.Schemas.Node;"));
    assert!(text.contains("            children?: Components.Schemas.Node[];"));
    assert!(text.contains("            label?: string | null;"));
    assert!(text.contains("            export type $200 = Components.Schemas.Node;"));
}

#[test]
fn test_unresolvable_reference_is_unknown() {
    let doc = oak_core::parse::from_yaml(
        r##"
openapi: 3.0.0
info: { title: t, version: "1" }
paths:
  /a:
    get:
      operationId: getA
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema: { $ref: '#/components/schemas/Gone' }
"##,
    )
    .unwrap();
    let text = type_definitions(&doc);
    assert!(text.contains("            export type $200 = unknown;"), "{text}");
}

#[test]
fn test_client_header_imports_type_definitions() {
    let doc = load("petstore.yaml", PETSTORE);
    let text = api_client(&doc);
    assert!(text.contains("import type { Paths } from \"./typeDefinitions\";"));
    assert!(text.contains("const createPath = (path: string, pathParams?: object): string => {"));
    assert!(text.contains("arrayFormat: \"comma\""));
    // Parameter names are matched literally, never compiled into a pattern.
    assert!(text.contains("            .split(`{${key}}`)\n            .join(segment)\n"));
    assert!(text.contains("            .map((part) => (part === `:${key}` ? segment : part))\n"));
    assert!(!text.contains("new RegExp"));

    let imports = ImportPaths {
        type_definitions: "../types/api".to_string(),
        ..ImportPaths::default()
    };
    let text = emit(&mut ApiClientEmitter::new(), &doc, &imports);
    assert!(text.contains("import type { Paths } from \"../types/api\";"));
}

#[test]
fn test_path_param_only_operation() {
    let text = api_client(&load("petstore.yaml", PETSTORE));
    let lines: Vec<&str> = text.lines().collect();
    let start = lines
        .iter()
        .position(|l| *l == "export interface ShowPetByIdParams extends Params {")
        .unwrap();
    assert_eq!(
        lines[start..start + 7].join("\n"),
        [
            "export interface ShowPetByIdParams extends Params {",
            "    pathParams: Paths.ShowPetById.PathParameters;",
            "}",
            "",
            "const showPetById =",
            "    (config: APIClientConfig) =>",
            "    async (params: ShowPetByIdParams): Promise<APIClientResponse<Paths.ShowPetById.Responses.$200, unknown>> => {",
        ]
        .join("\n")
    );
}

#[test]
fn test_operation_without_inputs_has_no_params_type() {
    let text = api_client(&load("petstore.yaml", PETSTORE));
    assert!(!text.contains("GetHealthParams"));
    assert!(text.contains(
        "    async (): Promise<APIClientResponse<unknown, unknown>> => {"
    ));
}

#[test]
fn test_list_pets_callable() {
    let text = api_client(&load("petstore.yaml", PETSTORE));
    assert!(text.contains("/** List the pets of an owner */\nconst listPets =\n"));
    let params = block(&text, "export interface ListPetsParams extends Params {", "}");
    assert_eq!(
        params,
        [
            "export interface ListPetsParams extends Params {",
            "    pathParams: Paths.ListPets.PathParameters;",
            "    queryParams: Paths.ListPets.QueryParameters;",
            "}",
        ]
        .join("\n")
    );
    assert!(text.contains("                path: \"/pets/{owner}\",\n"));
    assert!(text.contains("                queryParams: params.queryParams,\n"));
}

#[test]
fn test_request_body_serialization() {
    let text = api_client(&load("petstore.yaml", PETSTORE));

    let create = block(&text, "const createPet =", "    };");
    assert!(create.contains("body: JSON.stringify(params.body),"));
    assert!(create.contains("\"Content-Type\": \"application/json\","));
    assert!(text.contains("    body: Paths.CreatePet.RequestBody;\n"));

    let upload = block(&text, "const uploadPetPhoto =", "    };");
    assert!(upload.contains("                body: params.body,\n"));
    assert!(!upload.contains("JSON.stringify"));
    assert!(!upload.contains("Content-Type"));
    assert!(text.contains("    body?: FormData;\n"));
}

#[test]
fn test_client_footer() {
    let text = api_client(&load("petstore.yaml", PETSTORE));
    let footer = block(
        &text,
        "export const getAPIClient = (config: APIClientConfig) => ({",
        "});",
    );
    assert_eq!(
        footer,
        [
            "export const getAPIClient = (config: APIClientConfig) => ({",
            "    listPets: listPets(config),",
            "    createPet: createPet(config),",
            "    showPetById: showPetById(config),",
            "    uploadPetPhoto: uploadPetPhoto(config),",
            "    getHealth: getHealth(config),",
            "});",
        ]
        .join("\n")
    );
    assert!(text.ends_with("export type APIClient = ReturnType<typeof getAPIClient>;\n"));
}

const COLLIDING_PARAMETERS: &str = r#"
openapi: 3.0.0
info: { title: t, version: "1" }
paths:
  /items/{item-id}:
    get:
      operationId: getItem
      parameters:
        - { name: itemId, in: query, schema: { type: integer } }
        - { name: item-id, in: path, required: true, schema: { type: string } }
      responses: {}
"#;

#[test]
fn test_colliding_parameter_names_are_all_declared() {
    let doc = oak_core::parse::from_yaml(COLLIDING_PARAMETERS).unwrap();
    let types = type_definitions(&doc);
    assert_eq!(
        block(&types, "    namespace GetItem {", "    }"),
        [
            "    namespace GetItem {",
            "        namespace Parameters {",
            "            export type ItemId = number;",
            "            export type ItemId_2 = string;",
            "        }",
            "        export interface PathParameters {",
            "            \"item-id\": Parameters.ItemId_2;",
            "        }",
            "        export interface QueryParameters {",
            "            itemId?: Parameters.ItemId;",
            "        }",
            "    }",
        ]
        .join("\n")
    );

    let client = api_client(&doc);
    assert!(client.contains("    pathParams: Paths.GetItem.PathParameters;\n"));
    assert!(client.contains("    queryParams: Paths.GetItem.QueryParameters;\n"));
}

#[test]
fn test_colliding_component_names_are_numbered() {
    let doc = oak_core::parse::from_yaml(
        r##"
openapi: 3.0.0
info: { title: t, version: "1" }
paths:
  /pets:
    get:
      operationId: listPets
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema: { $ref: '#/components/schemas/pet' }
components:
  schemas:
    Pet: { type: string }
    pet: { type: integer }
"##,
    )
    .unwrap();
    let text = type_definitions(&doc);
    assert!(text.contains("        export type Pet = string;\n"));
    assert!(text.contains("        export type Pet_2 = number;\n"));
    assert_eq!(text.matches("export type Pet = ").count(), 1);
    assert!(text.contains("            export type $200 = Components.Schemas.Pet_2;\n"));
}
