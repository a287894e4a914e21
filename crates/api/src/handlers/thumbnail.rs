//! Cached JPEG thumbnail generation and serving.

use std::path::PathBuf;

use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use boxlab_core::storage::project_dir;
use boxlab_core::types::DbId;

use crate::error::{AppError, AppResult};
use crate::handlers::image::find_image;
use crate::state::AppState;

const SIZES: &[(&str, u32)] = &[("small", 150), ("medium", 300), ("large", 600)];

fn size_pixels(size: &str) -> Option<u32> {
    SIZES.iter().find(|(name, _)| *name == size).map(|(_, px)| *px)
}

fn cache_path(state: &AppState, image_id: DbId, size: &str) -> PathBuf {
    state
        .config
        .upload_dir
        .join("thumbnails")
        .join(format!("{image_id}_{size}.jpg"))
}

/// GET /api/v1/images/{id}/thumbnail/{size}
///
/// Sizes are `small` (150px), `medium` (300px), `large` (600px); the
/// bounding dimension is scaled down preserving aspect ratio. Generated
/// thumbnails are cached on disk and reused.
pub async fn get(
    State(state): State<AppState>,
    Path((id, size)): Path<(DbId, String)>,
) -> AppResult<Response> {
    let Some(pixels) = size_pixels(&size) else {
        return Err(AppError::BadRequest(format!(
            "Invalid thumbnail size '{size}', expected small, medium, or large"
        )));
    };

    let image = find_image(&state, id).await?;
    let cached = cache_path(&state, id, &size);

    if tokio::fs::try_exists(&cached).await.unwrap_or(false) {
        return serve_jpeg(&cached).await;
    }

    let source = project_dir(&state.config.upload_dir, image.project_id).join(&image.filename);
    if let Some(parent) = cached.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;
    }

    let dest = cached.clone();
    tokio::task::spawn_blocking(move || -> Result<(), String> {
        let img = image::open(&source).map_err(|e| e.to_string())?;
        img.thumbnail(pixels, pixels)
            .to_rgb8()
            .save(&dest)
            .map_err(|e| e.to_string())
    })
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))?
    .map_err(|e| AppError::InternalError(format!("Thumbnail generation failed: {e}")))?;

    serve_jpeg(&cached).await
}

/// Remove all cached thumbnails for an image. Best-effort.
pub(crate) async fn remove_cached(state: &AppState, image_id: DbId) {
    for (size, _) in SIZES {
        let path = cache_path(state, image_id, size);
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %e, path = %path.display(), "Failed to remove cached thumbnail");
            }
        }
    }
}

async fn serve_jpeg(path: &std::path::Path) -> AppResult<Response> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "image/jpeg")
        .header(header::CONTENT_LENGTH, data.len().to_string())
        .header(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=86400"),
        )
        .body(Body::from(data))
        .map_err(|e| AppError::InternalError(e.to_string()))?)
}
