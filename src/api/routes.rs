//! HTTP API route definitions.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;

use super::docs::docs_router;
use super::handlers::{
    create_item, create_user, get_model, get_user, health, method_not_allowed, not_found,
    read_catalog, read_file, read_file_root, read_item, read_user_item, root, update_item,
    AppState,
};
use crate::metrics::track_metrics;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoint
        .route("/health", get(health))
        // Parameter binding samples
        .route("/", get(root))
        .route("/items/:item_id", get(read_item))
        .route("/models/:model_name", get(get_model))
        .route("/files/", get(read_file_root))
        .route("/files/*file_path", get(read_file))
        .route("/querys/", get(read_catalog))
        .route("/users/:user_id/items/:item_id", get(read_user_item))
        // Body binding samples
        .route("/sample_items/", post(create_item))
        .route("/dummy_items/:item_id", put(update_item))
        // Token-protected users
        .route("/users/:user_id", get(get_user))
        .route("/users/", post(create_user))
        .route_layer(middleware::from_fn(track_metrics))
        .with_state(state)
        .merge(docs_router())
        .fallback(not_found)
        .layer(middleware::map_response(method_not_allowed))
        .layer(TraceLayer::new_for_http())
}
