//! Image upload and retrieval.

use std::path::PathBuf;

use actix_files::Files;
use actix_multipart::Multipart;
use actix_web::{HttpResponse, web};
use futures_util::StreamExt;

use quill_core::DomainError;
use quill_shared::dto::UploadResponse;

use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::{AppState, UPLOADS_PREFIX};

/// Multipart field carrying the file.
const IMAGE_FIELD: &str = "image";

/// POST /upload - multipart with an `image` file field
pub async fn upload_image(
    _identity: Identity,
    state: web::Data<AppState>,
    mut payload: Multipart,
) -> AppResult<HttpResponse> {
    while let Some(item) = payload.next().await {
        let mut field = item.map_err(|e| AppError::BadRequest(e.to_string()))?;

        if field.name() != Some(IMAGE_FIELD) {
            // Drain fields we do not care about
            while let Some(chunk) = field.next().await {
                chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
            }
            continue;
        }

        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned)
            .ok_or_else(|| AppError::BadRequest("Uploaded file has no name".to_string()))?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.next().await {
            let chunk = chunk.map_err(|e| AppError::BadRequest(e.to_string()))?;
            if bytes.len() + chunk.len() > state.upload_max_bytes {
                return Err(AppError::BadRequest(format!(
                    "Upload exceeds {} bytes",
                    state.upload_max_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        let url = state
            .uploads
            .store(&file_name, bytes)
            .await
            .map_err(DomainError::from)?;

        tracing::info!(url = %url, "Image uploaded");
        return Ok(HttpResponse::Ok().json(UploadResponse { url }));
    }

    Err(AppError::BadRequest(format!(
        "Multipart field '{IMAGE_FIELD}' is required"
    )))
}

/// GET /uploads/{filename}: stored files served straight from disk with
/// content-type guessing, conditional requests and ranges.
pub fn upload_files(dir: impl Into<PathBuf>) -> Files {
    Files::new(UPLOADS_PREFIX, dir.into()).use_last_modified(true)
}
