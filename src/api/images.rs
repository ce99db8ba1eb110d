use axum::extract::State;

use crate::error::AppError;
use crate::models::upload::{ImageListResponse, StoredImage};
use crate::state::AppState;

/// Axum handler for `GET /api/images`.
///
/// Lists what is currently in the shared upload directory, oldest first.
/// The browser gallery does not use this; it only shows the session's uploads.
pub async fn list_images_handler(
    State(state): State<AppState>,
) -> Result<axum::Json<ImageListResponse>, AppError> {
    let images = state
        .store
        .list()
        .await?
        .into_iter()
        .map(|object| StoredImage {
            url: state.settings.public_url(&object.key),
            filename: object
                .key
                .rsplit('/')
                .next()
                .unwrap_or(object.key.as_str())
                .to_string(),
            size: object.size,
            modified_at: object.modified_at,
        })
        .collect();

    Ok(axum::Json(ImageListResponse { images }))
}
