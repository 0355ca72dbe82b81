use sea_orm::Database;
use tracing::info;

use bras_access_codes::config::AccessCodesConfig;
use bras_access_codes::router::build_router;
use bras_access_codes::state::AppState;
use bras_access_codes::telemetry::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AccessCodesConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let state = AppState { db };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!("access-codes service listening on {addr}");
    axum::serve(listener, router).await.expect("server error");
}
