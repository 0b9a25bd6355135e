pub mod health;

use axum::{routing::get, Router};
use tower_http::catch_panic::CatchPanicLayer;

use crate::applications::handlers;
use crate::errors::handle_panic;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/job-applications",
            get(handlers::handle_list).post(handlers::handle_create),
        )
        .route(
            "/api/job-applications/:id",
            get(handlers::handle_get)
                .put(handlers::handle_update)
                .delete(handlers::handle_delete),
        )
        .layer(CatchPanicLayer::custom(handle_panic))
        .with_state(state)
}
