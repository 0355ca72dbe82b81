use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::handlers::codes::{code_stats, export_batch, generate_codes, list_codes, verify_code};
use crate::handlers::health::{healthz, readyz};
use crate::middleware::request_id_layer;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Operator surface
        .route("/access-codes/generate", post(generate_codes))
        .route("/access-codes/list", get(list_codes))
        .route("/access-codes/stats", get(code_stats))
        .route("/access-codes/export/{batch_id}", get(export_batch))
        // Public redemption gate
        .route("/access-codes/verify", post(verify_code))
        .layer(TraceLayer::new_for_http())
        .layer(request_id_layer())
        .with_state(state)
}
