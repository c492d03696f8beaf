use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::media_type::{MediaType, is_json_content_type};
use super::schema::SchemaOrRef;

/// A response definition.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub content: IndexMap<String, MediaType>,
}

impl Response {
    /// The schema of the first JSON media type, if any.
    pub fn json_schema(&self) -> Option<&SchemaOrRef> {
        self.content
            .iter()
            .filter(|(content_type, _)| is_json_content_type(content_type))
            .find_map(|(_, media)| media.schema.as_ref())
    }
}

/// A reference or inline response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResponseOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    Response(Response),
}
