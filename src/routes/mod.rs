pub mod assets;
pub mod generate;
pub mod health;
pub mod metrics;

use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;

use crate::app_state::AppState;

/// Dashboard page, API and health routes. `/metrics` and the static file
/// service are attached by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Dashboard UI (embedded at compile time)
        .route("/", get(|| async { Html(include_str!("../../static/index.html")) }))
        .route("/health", get(health::health_check))
        // Generators
        .route("/api/restyle", post(generate::restyle))
        .route("/api/create-photo", post(generate::create_photo))
        .route("/api/create-ugc", post(generate::create_ugc))
        .route(
            "/api/create-video",
            post(generate::create_video).get(generate::video_status),
        )
        // Asset library
        .route(
            "/api/assets",
            get(assets::list_assets).post(assets::add_asset),
        )
        .route(
            "/api/assets/{id}",
            get(assets::get_asset)
                .patch(assets::update_label)
                .delete(assets::delete_asset),
        )
        .with_state(state)
}
