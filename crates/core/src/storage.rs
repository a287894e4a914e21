//! Storage naming conventions for uploaded pixel files.

use std::path::{Path, PathBuf};

use crate::types::DbId;

/// Maximum size of one uploaded image file: 10 MiB.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Image extensions accepted for upload and dataset-import scanning,
/// matched case-insensitively.
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Whether a filename carries an accepted image extension.
pub fn has_image_extension(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            let lower = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&lower.as_str())
        })
}

/// Opaque stored filename for an upload: a fresh UUID with the original
/// file's extension (lowercased) preserved.
pub fn opaque_filename(original_name: &str) -> String {
    let ext = Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();
    if ext.is_empty() {
        uuid::Uuid::new_v4().to_string()
    } else {
        format!("{}.{ext}", uuid::Uuid::new_v4())
    }
}

/// Directory for one project's stored images, under the uploads root.
pub fn project_dir(uploads_root: &Path, project_id: DbId) -> PathBuf {
    uploads_root.join(format!("project_{project_id}"))
}
