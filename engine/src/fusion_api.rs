//! Wire types and paths of the Fusion Brain text-to-image API.

use serde::{Deserialize, Serialize};

use crate::job::GenerationRequest;

pub const MODELS_PATH: &str = "/key/api/v1/models";
pub const RUN_PATH: &str = "/key/api/v1/text2image/run";

pub const STATUS_DONE: &str = "DONE";
pub const STATUS_FAILED: &str = "FAILED";

pub fn status_path(uuid: &str) -> String {
    format!("/key/api/v1/text2image/status/{uuid}")
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelDescriptor {
    pub id: ModelId,
    pub name: Option<String>,
}

/// The service sends numeric ids, but anything scalar is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawModelId")]
pub struct ModelId(pub String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawModelId {
    Text(String),
    Number(serde_json::Number),
}

impl From<RawModelId> for ModelId {
    fn from(raw: RawModelId) -> Self {
        match raw {
            RawModelId::Text(s) => ModelId(s),
            RawModelId::Number(n) => ModelId(n.to_string()),
        }
    }
}

/// JSON document sent in the `params` field of the run request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunParams<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub num_images: u32,
    pub width: u32,
    pub height: u32,
    pub generate_params: GenerateParams<'a>,
}

#[derive(Debug, Serialize)]
pub struct GenerateParams<'a> {
    pub query: &'a str,
}

impl<'a> RunParams<'a> {
    pub fn from_request(req: &'a GenerationRequest) -> Self {
        Self {
            kind: "GENERATE",
            num_images: req.image_count(),
            width: req.width(),
            height: req.height(),
            generate_params: GenerateParams {
                query: req.prompt(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RunResponse {
    pub uuid: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    pub status: Option<String>,
    pub images: Option<Vec<String>>,
    pub error_description: Option<String>,
    pub censored: Option<bool>,
}
