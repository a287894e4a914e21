//! YOLO dataset export and import endpoints.
//!
//! Export assembles the codec's directory tree in a scratch directory,
//! zips it, and streams the archive back. Import accepts a zip upload,
//! extracts it to scratch, scans it with the codec, and writes the
//! results through the normal storage and repository paths.

use std::fs;
use std::io::Write;
use std::path::{Path as StdPath, PathBuf};
use std::time::Duration;

use axum::body::Body;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::Response;
use axum::Json;
use boxlab_core::dataset::{
    locate_dataset_layout, scan_dataset, write_export_tree, ExportImage, LabelRecord,
};
use boxlab_core::error::CoreError;
use boxlab_core::geometry::NormBox;
use boxlab_core::storage::{opaque_filename, project_dir};
use boxlab_core::types::DbId;
use boxlab_db::models::annotation::CreateAnnotation;
use boxlab_db::models::image::CreateImage;
use boxlab_db::models::project::Project;
use boxlab_db::repositories::{AnnotationRepo, ImageRepo, ProjectRepo};
use serde::Serialize;
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// Counters returned by the import endpoint. Partial failures surface
/// here as error strings, not as an error status.
#[derive(Debug, Serialize)]
pub struct ImportResult {
    pub images_imported: usize,
    pub annotations_imported: usize,
    pub classes_found: usize,
    pub errors: Vec<String>,
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/export
///
/// Build and return the project's YOLO dataset as a zip attachment. The
/// scratch directory is removed after a configured delay.
pub async fn export(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Response> {
    let project = find_project(&state, id).await?;
    let images = ImageRepo::list_by_project(&state.pool, id).await?;
    if images.is_empty() {
        return Err(AppError::BadRequest(
            "Project has no images to export".to_string(),
        ));
    }

    let source_dir = project_dir(&state.config.upload_dir, id);
    let mut export_images = Vec::with_capacity(images.len());
    for image in &images {
        let annotations = AnnotationRepo::list_by_image(&state.pool, image.id).await?;
        let labels = annotations
            .iter()
            .map(|a| LabelRecord {
                class_id: a.class_id,
                bbox: NormBox {
                    x_center: a.x_center,
                    y_center: a.y_center,
                    width: a.width,
                    height: a.height,
                },
            })
            .collect();
        export_images.push(ExportImage {
            source_path: source_dir.join(&image.filename),
            original_name: image.original_name.clone(),
            labels,
        });
    }

    let class_names = project.class_names();
    let zip_name = format!("{}_yolo_dataset.zip", sanitize_name(&project.name));

    let scratch = tempfile::tempdir()
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .keep();
    let scratch_for_task = scratch.clone();
    let zip_name_for_task = zip_name.clone();

    let result = tokio::task::spawn_blocking(move || -> AppResult<Vec<u8>> {
        let tree_dir = scratch_for_task.join("dataset");
        write_export_tree(&tree_dir, &export_images, &class_names)?;

        let zip_path = scratch_for_task.join(&zip_name_for_task);
        zip_directory(&tree_dir, &zip_path)
            .map_err(|e| AppError::InternalError(format!("Failed to build archive: {e}")))?;

        fs::read(&zip_path).map_err(|e| AppError::InternalError(e.to_string()))
    })
    .await
    .map_err(|e| AppError::InternalError(e.to_string()));

    schedule_scratch_cleanup(scratch, state.config.export_cleanup_delay_secs);
    let data = result??;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "application/zip")
        .header(
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{zip_name}\""),
        )
        .header(header::CONTENT_LENGTH, data.len().to_string())
        .body(Body::from(data))
        .map_err(|e| AppError::InternalError(e.to_string()))?)
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// POST /api/v1/projects/{id}/import
///
/// Accept a multipart `dataset` zip, extract and scan it, and store every
/// importable image with its annotations. Discovered class names are only
/// counted in the response; the project's class list is never touched.
/// Per-file failures accumulate in the response counters; the endpoint
/// returns 200 even on partial success.
pub async fn import(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<ImportResult>>> {
    find_project(&state, id).await?;

    let mut archive_bytes = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        if field.name() == Some("dataset") || field.file_name().is_some() {
            archive_bytes = Some(
                field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?,
            );
            break;
        }
    }
    let Some(archive_bytes) = archive_bytes else {
        return Err(AppError::BadRequest(
            "No dataset archive uploaded".to_string(),
        ));
    };

    // Dropped on every return path, removing all extracted content.
    let scratch = tempfile::tempdir().map_err(|e| AppError::InternalError(e.to_string()))?;
    let extract_dir = scratch.path().join("extracted");

    let extract_dir_for_task = extract_dir.clone();
    let scan = tokio::task::spawn_blocking(move || {
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(archive_bytes))
            .map_err(|e| CoreError::Validation(format!("Invalid zip archive: {e}")))?;
        archive
            .extract(&extract_dir_for_task)
            .map_err(|e| CoreError::Validation(format!("Failed to extract archive: {e}")))?;

        let layout = locate_dataset_layout(&extract_dir_for_task)?;
        scan_dataset(&layout)
    })
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))??;

    let dest_dir = project_dir(&state.config.upload_dir, id);
    tokio::fs::create_dir_all(&dest_dir)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let mut images_imported = 0usize;
    let mut annotations_imported = 0usize;
    let mut errors = scan.errors;

    for scanned in &scan.images {
        let filename = opaque_filename(&scanned.file_name);
        if let Err(e) = tokio::fs::copy(&scanned.path, dest_dir.join(&filename)).await {
            errors.push(format!("Failed to store {}: {e}", scanned.file_name));
            continue;
        }

        let image = match ImageRepo::create(
            &state.pool,
            &CreateImage {
                project_id: id,
                filename,
                original_name: scanned.file_name.clone(),
                width: scanned.width as i32,
                height: scanned.height as i32,
            },
        )
        .await
        {
            Ok(image) => image,
            Err(e) => {
                tracing::error!(error = %e, file = %scanned.file_name, "Failed to record imported image");
                errors.push(format!("Failed to record {}", scanned.file_name));
                continue;
            }
        };
        images_imported += 1;

        for label in &scanned.labels {
            let input = CreateAnnotation {
                class_id: label.class_id,
                x_center: label.bbox.x_center,
                y_center: label.bbox.y_center,
                width: label.bbox.width,
                height: label.bbox.height,
            };
            match AnnotationRepo::create(&state.pool, image.id, &input).await {
                Ok(_) => annotations_imported += 1,
                Err(e) => {
                    tracing::error!(error = %e, file = %scanned.file_name, "Failed to record imported annotation");
                    errors.push(format!("Failed to record a label for {}", scanned.file_name));
                }
            }
        }
    }

    Ok(Json(DataResponse {
        data: ImportResult {
            images_imported,
            annotations_imported,
            classes_found: scan.class_names.len(),
            errors,
        },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_project(state: &AppState, id: DbId) -> AppResult<Project> {
    ProjectRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Project",
            id,
        }))
}

/// Replace filename-hostile characters in a project name.
fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Zip a directory tree, storing entries with forward-slash relative paths.
fn zip_directory(src: &StdPath, dest: &StdPath) -> Result<(), Box<dyn std::error::Error>> {
    let file = fs::File::create(dest)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
    add_dir_entries(&mut writer, src, src, options)?;
    writer.finish()?;
    Ok(())
}

fn add_dir_entries(
    writer: &mut ZipWriter<fs::File>,
    root: &StdPath,
    dir: &StdPath,
    options: SimpleFileOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    for path in entries {
        if path.is_dir() {
            add_dir_entries(writer, root, &path, options)?;
        } else {
            let rel = path
                .strip_prefix(root)?
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            writer.start_file(rel, options)?;
            writer.write_all(&fs::read(&path)?)?;
        }
    }
    Ok(())
}

/// Remove an export scratch directory after the configured delay, giving
/// the client time to finish the download.
fn schedule_scratch_cleanup(scratch: PathBuf, delay_secs: u64) {
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        if let Err(e) = tokio::fs::remove_dir_all(&scratch).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(error = %e, dir = %scratch.display(), "Failed to remove export scratch directory");
            }
        }
    });
}
