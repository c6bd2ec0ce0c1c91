use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use garde::Validate;
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::asset::{Asset, AssetFilter, LabelCounts, NewAsset, ReviewLabel};

#[derive(Debug, Serialize, Deserialize)]
pub struct AssetListResponse {
    pub assets: Vec<Asset>,
    pub counts: LabelCounts,
}

#[derive(Debug, Deserialize)]
pub struct UpdateLabelRequest {
    pub label: ReviewLabel,
}

/// GET /api/assets — library contents, optionally filtered by type, label and search text.
pub async fn list_assets(
    State(state): State<AppState>,
    query: Result<Query<AssetFilter>, QueryRejection>,
) -> Result<Json<AssetListResponse>, ApiError> {
    let Query(filter) = query?;
    Ok(Json(AssetListResponse {
        assets: state.assets.list(&filter),
        counts: state.assets.counts(),
    }))
}

/// POST /api/assets
pub async fn add_asset(
    State(state): State<AppState>,
    payload: Result<Json<NewAsset>, JsonRejection>,
) -> Result<(StatusCode, Json<Asset>), ApiError> {
    let Json(new) = payload?;
    new.validate()?;
    Ok((StatusCode::CREATED, Json(state.assets.add(new))))
}

pub async fn get_asset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Asset>, ApiError> {
    state
        .assets
        .get(&id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Asset {id} not found")))
}

/// PATCH /api/assets/{id} — change the review label.
pub async fn update_label(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateLabelRequest>, JsonRejection>,
) -> Result<Json<Asset>, ApiError> {
    let Json(req) = payload?;
    state
        .assets
        .update_label(&id, req.label)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Asset {id} not found")))
}

/// DELETE /api/assets/{id} — succeeds whether or not the asset existed.
pub async fn delete_asset(State(state): State<AppState>, Path(id): Path<String>) -> StatusCode {
    state.assets.delete(&id);
    StatusCode::NO_CONTENT
}
