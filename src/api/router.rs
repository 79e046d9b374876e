use axum::routing::get;
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: AppState) -> Router {
    let ops = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // Board data; the bearer token, when present, identifies the principal
    let api = Router::new()
        // Profiles
        .route("/api/profiles/:user_id/stats", get(handlers::profile::stats))
        .route("/api/profiles/:user_id/board", get(handlers::profile::board))
        // Wallets
        .route("/api/wallets/:address/rewards", get(handlers::wallet::rewards))
        .route("/api/wallets/:address/balances", get(handlers::wallet::balances))
        // WebSocket
        .route("/ws/board", get(handlers::ws::handler));

    // The board is embedded in the social app's frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    ops.merge(api)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
