use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use chrono::{DateTime, Utc};

use crate::config::Settings;
use crate::error::AppError;
use crate::models::upload::UploadResponse;
use crate::policy::UploadPolicy;
use crate::state::AppState;
use crate::storage::layout::UploadClock;
use crate::storage::local::ImageStore;

/// Attempts at finding a free name before giving up.
const MAX_NAME_ATTEMPTS: usize = 5;

/// Multipart field carrying the image.
const FILE_FIELD: &str = "file";

/// Content type assumed when the part does not declare one.
const UNKNOWN_CONTENT_TYPE: &str = "application/octet-stream";

/// Core of the upload handler, independent of the axum extractors.
///
/// Names the file, writes it without overwriting anything and builds the
/// success body. Type and size checks happen while the body is streamed,
/// before this is called.
pub async fn store_upload(
    store: &dyn ImageStore,
    settings: &Settings,
    clock: &UploadClock,
    original_name: &str,
    data: &[u8],
    now: DateTime<Utc>,
) -> Result<UploadResponse, AppError> {
    if data.is_empty() {
        return Err(AppError::BadRequest("The uploaded file is empty".into()));
    }

    for _ in 0..MAX_NAME_ATTEMPTS {
        let stamp = clock.next_stamp(now.timestamp_millis());
        let destination = settings.layout.destination(now, stamp, original_name);

        match store.put_new(&destination.key, data).await {
            Ok(()) => {
                return Ok(UploadResponse::stored(
                    settings.public_url(&destination.key),
                    destination.filename,
                    data.len() as u64,
                ));
            }
            Err(AppError::AlreadyExists(key)) => {
                tracing::debug!(key = %key, "Destination taken, retrying with a new stamp");
            }
            Err(e) => return Err(e),
        }
    }

    Err(AppError::Storage(format!(
        "No free file name for '{}' after {} attempts",
        original_name, MAX_NAME_ATTEMPTS
    )))
}

/// Axum handler for `POST /api/upload`.
///
/// Accepts a multipart form with a single file field named "file" and
/// writes it into the shared upload directory.
pub async fn upload_image_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<axum::Json<UploadResponse>, AppError> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(&state.policy, e))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field
            .content_type()
            .unwrap_or(UNKNOWN_CONTENT_TYPE)
            .to_string();

        state.policy.check_content_type(&content_type)?;

        let mut data = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(&state.policy, e))?
        {
            state
                .policy
                .check_size((data.len() + chunk.len()) as u64)?;
            data.extend_from_slice(&chunk);
        }

        let response = store_upload(
            state.store.as_ref(),
            &state.settings,
            &state.clock,
            &file_name,
            &data,
            Utc::now(),
        )
        .await?;

        tracing::info!(
            url = %response.image_url,
            size = response.size,
            content_type = %content_type,
            original = %file_name,
            "Stored upload"
        );

        return Ok(axum::Json(response));
    }

    Err(AppError::BadRequest(format!(
        "No file found in the '{}' field",
        FILE_FIELD
    )))
}

/// Map a multipart read failure, treating a body-limit breach as an oversized file.
fn multipart_error(policy: &UploadPolicy, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        policy.too_large()
    } else {
        AppError::BadRequest(format!("Malformed upload: {}", err.body_text()))
    }
}
