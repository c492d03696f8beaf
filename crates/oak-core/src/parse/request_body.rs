use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::media_type::{MediaType, is_form_data_content_type, is_json_content_type};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub content: IndexMap<String, MediaType>,

    #[serde(default)]
    pub required: bool,
}

impl RequestBody {
    /// The media type a generated client sends: JSON if offered, then multipart
    /// form data, then whatever is listed first.
    pub fn preferred_content(&self) -> Option<(&str, &MediaType)> {
        self.content
            .iter()
            .find(|(ct, _)| is_json_content_type(ct))
            .or_else(|| self.content.iter().find(|(ct, _)| is_form_data_content_type(ct)))
            .or_else(|| self.content.first())
            .map(|(ct, media)| (ct.as_str(), media))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestBodyOrRef {
    Ref {
        #[serde(rename = "$ref")]
        ref_path: String,
    },
    RequestBody(RequestBody),
}
