use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use garde::Validate;

use crate::app_state::AppState;
use crate::error::{required, ApiError};
use crate::models::asset::{AssetKind, NewAsset};
use crate::models::requests::{
    CreatePhotoRequest, CreateUgcRequest, CreateVideoQuery, CreateVideoRequest,
    MultiOutputResponse, RestyleRequest, SingleOutputResponse, UgcResponse, VideoResponse,
    VideoStartedResponse, VideoStatusQuery, VideoStatusResponse,
};
use crate::services::generation::{VideoInput, DEFAULT_PHOTO_ASPECT};

/// POST /api/restyle — relight one photo.
pub async fn restyle(
    State(state): State<AppState>,
    payload: Result<Json<RestyleRequest>, JsonRejection>,
) -> Result<Json<SingleOutputResponse>, ApiError> {
    let Json(req) = payload?;
    let image = required(&req.image_base64, "Image is required")?;
    state.generation.client().ensure_configured()?;

    let output_url = state.generation.restyle(image).await?;

    if req.save_asset {
        state
            .assets
            .add(NewAsset::generated(output_url.clone(), AssetKind::Restyle));
    }

    Ok(Json(SingleOutputResponse { output_url }))
}

/// POST /api/create-photo — four variations of an actor photo.
pub async fn create_photo(
    State(state): State<AppState>,
    payload: Result<Json<CreatePhotoRequest>, JsonRejection>,
) -> Result<Json<MultiOutputResponse>, ApiError> {
    let Json(mut req) = payload?;
    req.aspect_ratio = non_empty(req.aspect_ratio.take());
    let prompt = required(&req.prompt, "Prompt is required")?;
    let image = required(&req.image_base64, "Reference image is required")?;
    req.validate()?;
    state.generation.client().ensure_configured()?;

    let aspect_ratio = req.aspect_ratio.as_deref().unwrap_or(DEFAULT_PHOTO_ASPECT);

    let output_urls = state
        .generation
        .create_photos(prompt, image, aspect_ratio)
        .await;

    if output_urls.is_empty() {
        return Err(ApiError::NoImagesGenerated);
    }

    tracing::info!(generated = output_urls.len(), "Photo variations ready");

    if req.save_asset {
        for url in &output_urls {
            let mut asset = NewAsset::generated(url.clone(), AssetKind::Create);
            asset.prompt = Some(prompt.to_string());
            state.assets.add(asset);
        }
    }

    Ok(Json(MultiOutputResponse { output_urls }))
}

/// POST /api/create-ugc — actor presenting a product, vertical.
pub async fn create_ugc(
    State(state): State<AppState>,
    payload: Result<Json<CreateUgcRequest>, JsonRejection>,
) -> Result<Json<UgcResponse>, ApiError> {
    let Json(req) = payload?;
    let message = "Actor and product are required";
    let actor_name = required(&req.actor_name, message)?;
    let product_name = required(&req.product_name, message)?;
    let actor_image = required(&req.actor_image_base64, "Actor image is required")?;
    let product_image = required(&req.product_image_base64, "Product image is required")?;
    req.validate()?;
    state.generation.client().ensure_configured()?;

    let ugc = state
        .generation
        .create_ugc(actor_name, product_name, actor_image, product_image)
        .await?;

    if req.save_asset {
        let mut asset = NewAsset::generated(ugc.output_url.clone(), AssetKind::Ugc);
        asset.prompt = Some(ugc.prompt.clone());
        asset.actor = Some(actor_name.to_string());
        asset.product = Some(product_name.to_string());
        state.assets.add(asset);
    }

    Ok(Json(UgcResponse {
        output_url: ugc.output_url,
        prompt: ugc.prompt,
    }))
}

/// POST /api/create-video — generate a clip.
///
/// Waits for the result unless called with `?wait=false`, in which case the
/// prediction id is returned for polling through [`video_status`].
pub async fn create_video(
    State(state): State<AppState>,
    query: Result<Query<CreateVideoQuery>, QueryRejection>,
    payload: Result<Json<CreateVideoRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Query(query) = query?;
    let Json(mut req) = payload?;
    req.aspect_ratio = non_empty(req.aspect_ratio.take());
    req.reference_image_url = non_empty(req.reference_image_url.take());
    let prompt = required(&req.prompt, "Prompt is required")?;
    req.validate()?;
    state.generation.client().ensure_configured()?;

    let input = VideoInput::new(
        prompt,
        req.reference_image_url.as_deref(),
        req.duration,
        req.aspect_ratio.as_deref(),
    );

    if !query.wait {
        let prediction = state.generation.start_video(&input).await?;
        return Ok(Json(VideoStartedResponse {
            success: true,
            prediction_id: prediction.id,
            status: prediction.status.to_string(),
        })
        .into_response());
    }

    let (prediction_id, output_url) = state.generation.create_video(&input).await?;

    if req.save_asset {
        let mut asset = NewAsset::generated(output_url.clone(), AssetKind::Ugc);
        asset.prompt = Some(prompt.to_string());
        state.assets.add(asset);
    }

    Ok(Json(VideoResponse {
        output_url,
        prediction_id,
    })
    .into_response())
}

/// GET /api/create-video?id=... — provider status of a video prediction.
pub async fn video_status(
    State(state): State<AppState>,
    query: Result<Query<VideoStatusQuery>, QueryRejection>,
) -> Result<Json<VideoStatusResponse>, ApiError> {
    let Query(query) = query?;
    let id = required(&query.id, "Prediction ID is required")?;
    state.generation.client().ensure_configured()?;

    let prediction = state.generation.status(id).await?;

    Ok(Json(VideoStatusResponse {
        status: prediction.status.to_string(),
        output: prediction.output,
        error: prediction.error,
    }))
}

/// Optional text fields sent as `""` mean "not set".
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
