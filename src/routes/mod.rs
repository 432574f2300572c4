use axum::{Router, http::Uri, middleware, routing::get};
use tower_http::services::ServeDir;

use crate::{error::AppError, middleware::access::authorize, state::AppState};

pub mod doc;
pub mod health;
pub mod params;
pub mod products;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router(state: &AppState) -> Router<AppState> {
    products::router().route_layer(middleware::from_fn_with_state(state.clone(), authorize))
}

// Edge layers (tracing, limits) are added by the binary.
pub fn app(state: AppState) -> Router {
    let images = ServeDir::new(state.images.base_dir());
    Router::new()
        .route("/health", get(health::health_check))
        .nest("/api", create_api_router(&state))
        .nest_service("/img", images)
        .merge(doc::scalar_docs())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found(uri: Uri) -> AppError {
    tracing::debug!(path = %uri.path(), "no route matched");
    AppError::NotFound
}
