//! Route definitions for the campaign dashboard.

pub mod campaign;
pub mod dashboard;
pub mod leads;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::middleware::auth::require_operator;
use crate::AppState;

/// Build the full application router. Every route sits behind Basic Auth.
pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/campaigns", get(dashboard::campaigns))
        .route("/campaign/stats", get(dashboard::stats))
        .route("/campaign/leads", get(leads::list))
        .route("/campaign/start", post(campaign::start))
        .route("/campaign/pause", post(campaign::pause));

    Router::new()
        .route("/", get(dashboard::index))
        .nest("/api", api_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            require_operator,
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
