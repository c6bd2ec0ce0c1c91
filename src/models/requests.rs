use garde::Validate;
use serde::{Deserialize, Serialize};

/// Body of POST /api/restyle.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RestyleRequest {
    #[serde(default)]
    #[garde(skip)]
    pub image_base64: Option<String>,

    #[serde(default)]
    #[garde(skip)]
    pub save_asset: bool,
}

/// Body of POST /api/create-photo.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePhotoRequest {
    #[serde(default)]
    #[garde(length(max = 4000))]
    pub prompt: Option<String>,

    #[serde(default)]
    #[garde(skip)]
    pub image_base64: Option<String>,

    #[serde(default)]
    #[garde(length(min = 3, max = 8))]
    pub aspect_ratio: Option<String>,

    #[serde(default)]
    #[garde(skip)]
    pub save_asset: bool,
}

/// Body of POST /api/create-ugc.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUgcRequest {
    #[serde(default)]
    #[garde(length(max = 200))]
    pub actor_name: Option<String>,

    #[serde(default)]
    #[garde(length(max = 200))]
    pub product_name: Option<String>,

    #[serde(default)]
    #[garde(skip)]
    pub actor_image_base64: Option<String>,

    #[serde(default)]
    #[garde(skip)]
    pub product_image_base64: Option<String>,

    #[serde(default)]
    #[garde(skip)]
    pub save_asset: bool,
}

/// Body of POST /api/create-video.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVideoRequest {
    #[serde(default)]
    #[garde(length(max = 4000))]
    pub prompt: Option<String>,

    #[serde(default)]
    #[garde(length(max = 4096))]
    pub reference_image_url: Option<String>,

    /// Clip length in seconds
    #[serde(default)]
    #[garde(range(min = 1, max = 8))]
    pub duration: Option<u32>,

    #[serde(default)]
    #[garde(length(min = 3, max = 8))]
    pub aspect_ratio: Option<String>,

    #[serde(default)]
    #[garde(skip)]
    pub save_asset: bool,
}

/// Query of POST /api/create-video. `wait=false` returns right after submission.
#[derive(Debug, Deserialize)]
pub struct CreateVideoQuery {
    #[serde(default = "default_wait")]
    pub wait: bool,
}

fn default_wait() -> bool {
    true
}

/// Query of GET /api/create-video.
#[derive(Debug, Deserialize)]
pub struct VideoStatusQuery {
    #[serde(default)]
    pub id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleOutputResponse {
    pub output_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiOutputResponse {
    pub output_urls: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UgcResponse {
    pub output_url: String,
    pub prompt: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub output_url: String,
    pub prediction_id: String,
}

/// Returned by POST /api/create-video?wait=false.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStartedResponse {
    pub success: bool,
    pub prediction_id: String,
    pub status: String,
}

/// Returned by GET /api/create-video?id=...
#[derive(Debug, Serialize, Deserialize)]
pub struct VideoStatusResponse {
    pub status: String,
    pub output: Option<serde_json::Value>,
    pub error: Option<serde_json::Value>,
}
