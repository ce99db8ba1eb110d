use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::state::AppState;

use super::{images, upload};

/// JSON API routes, without the Leptos pages.
pub fn api_router(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/upload",
            post(upload::upload_image_handler)
                .layer(DefaultBodyLimit::max(state.policy.body_limit())),
        )
        .route("/api/images", get(images::list_images_handler))
}
