//! Handlers for image upload, retrieval, and file serving.

use std::io::Cursor;

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::Response;
use axum::Json;
use boxlab_core::error::CoreError;
use boxlab_core::storage::{has_image_extension, opaque_filename, project_dir, MAX_UPLOAD_BYTES};
use boxlab_core::types::DbId;
use boxlab_db::models::image::{CreateImage, Image};
use boxlab_db::repositories::{ImageRepo, ProjectRepo};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// POST /api/v1/projects/{project_id}/images
///
/// Accepts a multipart upload of image files. Files with an unsupported
/// extension, an oversized body, or unreadable dimensions are skipped
/// with a warning; the upload succeeds if at least one file was stored.
pub async fn upload(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<Vec<Image>>)> {
    ensure_project_exists(&state, project_id).await?;

    let dir = project_dir(&state.config.upload_dir, project_id);
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to create upload dir: {e}")))?;

    let mut created = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let Some(original_name) = field.file_name().map(str::to_string) else {
            continue;
        };

        if !has_image_extension(&original_name) {
            tracing::warn!(file = %original_name, "Skipping upload with unsupported extension");
            continue;
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        if data.len() > MAX_UPLOAD_BYTES {
            tracing::warn!(file = %original_name, size = data.len(), "Skipping oversized upload");
            continue;
        }

        let dimensions = image::ImageReader::new(Cursor::new(&data))
            .with_guessed_format()
            .ok()
            .and_then(|reader| reader.into_dimensions().ok());
        let Some((width, height)) = dimensions else {
            tracing::warn!(file = %original_name, "Skipping upload with unreadable dimensions");
            continue;
        };

        let filename = opaque_filename(&original_name);
        tokio::fs::write(dir.join(&filename), &data)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let image = ImageRepo::create(
            &state.pool,
            &CreateImage {
                project_id,
                filename,
                original_name,
                width: width as i32,
                height: height as i32,
            },
        )
        .await?;
        created.push(image);
    }

    if created.is_empty() {
        return Err(AppError::BadRequest(
            "No valid image files uploaded".to_string(),
        ));
    }

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/v1/projects/{project_id}/images
pub async fn list_by_project(
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<Vec<Image>>> {
    ensure_project_exists(&state, project_id).await?;
    let images = ImageRepo::list_by_project(&state.pool, project_id).await?;
    Ok(Json(images))
}

/// GET /api/v1/images/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Image>> {
    let image = find_image(&state, id).await?;
    Ok(Json(image))
}

/// GET /api/v1/images/{id}/file
///
/// Serve the stored pixel file.
pub async fn serve_file(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<Response> {
    let image = find_image(&state, id).await?;
    let path = project_dir(&state.config.upload_dir, image.project_id).join(&image.filename);

    let data = tokio::fs::read(&path)
        .await
        .map_err(|e| AppError::InternalError(format!("Stored image file missing: {e}")))?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&image.filename))
        .header(header::CONTENT_LENGTH, data.len().to_string())
        .header(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=86400"),
        )
        .body(Body::from(data))
        .map_err(|e| AppError::InternalError(e.to_string()))?)
}

/// DELETE /api/v1/images/{id}
///
/// Annotations cascade in the database; the stored file and any cached
/// thumbnails are removed best-effort.
pub async fn delete(State(state): State<AppState>, Path(id): Path<DbId>) -> AppResult<StatusCode> {
    let image = find_image(&state, id).await?;
    ImageRepo::delete(&state.pool, id).await?;

    let path = project_dir(&state.config.upload_dir, image.project_id).join(&image.filename);
    if let Err(e) = tokio::fs::remove_file(&path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(error = %e, path = %path.display(), "Failed to remove stored image file");
        }
    }
    crate::handlers::thumbnail::remove_cached(&state, id).await;

    Ok(StatusCode::NO_CONTENT)
}

/// Look up an image or return a 404 error.
pub(crate) async fn find_image(state: &AppState, id: DbId) -> AppResult<Image> {
    ImageRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Image", id }))
}

async fn ensure_project_exists(state: &AppState, id: DbId) -> AppResult<()> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))?;
    Ok(())
}

/// MIME type from a stored filename's extension.
pub(crate) fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit('.').next().map(str::to_lowercase).as_deref() {
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}
