use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use creative_dashboard::{app_state::AppState, config::AppConfig, routes};

#[tokio::main]
async fn main() {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .json()
        .init();

    // Load configuration from environment
    let config = AppConfig::from_env().expect("Failed to load configuration from environment");

    tracing::info!("Initializing creative-dashboard server");

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    let prometheus_handle = Arc::new(prometheus_handle);

    // Register application metrics
    metrics::describe_counter!(
        "predictions_submitted_total",
        "Predictions accepted by the provider"
    );
    metrics::describe_counter!(
        "predictions_succeeded_total",
        "Predictions that finished with output"
    );
    metrics::describe_counter!(
        "predictions_failed_total",
        "Predictions reported as failed or whose status could not be read"
    );
    metrics::describe_counter!(
        "predictions_timed_out_total",
        "Predictions still running when the poll budget ran out"
    );
    metrics::describe_histogram!(
        "prediction_duration_seconds",
        "Time from submission to terminal status"
    );

    if config.api_token().is_none() {
        tracing::warn!("REPLICATE_API_TOKEN is not set, generation requests will fail");
    }

    tracing::info!(
        base_url = %config.replicate_base_url,
        poll_interval_secs = config.poll_interval_secs,
        poll_max_attempts = config.poll_max_attempts,
        "Initializing Replicate client"
    );

    // Create shared application state
    let state = AppState::from_config(&config);

    let app = routes::router(state)
        // Reference portraits, product shots and demo media
        .nest_service("/public", ServeDir::new(&config.static_dir))
        // Prometheus metrics endpoint (separate state)
        .route(
            "/metrics",
            get(routes::metrics::prometheus_metrics).with_state(prometheus_handle),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(RequestBodyLimitLayer::new(config.max_body_bytes));

    tracing::info!("Starting creative-dashboard on {}", config.bind_addr);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await.expect("Server error");
}
