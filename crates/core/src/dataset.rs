//! YOLO dataset codec.
//!
//! Serializes a project's images and annotations into a portable directory
//! tree (`images/train/`, `labels/train/`, `classes.txt`, `train.txt`,
//! `data.yaml`) and parses the same layout back. All filesystem work here
//! is synchronous; the API layer wraps it in a blocking task.
//!
//! Label line contract: `"<class_id> <xc> <yc> <w> <h>"`, the four
//! geometry fields printed with exactly six decimal places. On parse, a
//! line is valid only if it has exactly five whitespace-separated tokens
//! that all parse as finite numbers; anything else is silently skipped.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::CoreError;
use crate::geometry::NormBox;
use crate::storage::has_image_extension;

/// Relative directory for exported images.
pub const IMAGES_SUBDIR: &str = "images/train";

/// Relative directory for exported label files.
pub const LABELS_SUBDIR: &str = "labels/train";

/// One label line: a class id and a normalized box.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelRecord {
    pub class_id: i64,
    pub bbox: NormBox,
}

// ---------------------------------------------------------------------------
// Line-level format
// ---------------------------------------------------------------------------

/// Format one label line with six-decimal fixed precision.
pub fn format_label_line(record: &LabelRecord) -> String {
    format!(
        "{} {:.6} {:.6} {:.6} {:.6}",
        record.class_id,
        record.bbox.x_center,
        record.bbox.y_center,
        record.bbox.width,
        record.bbox.height
    )
}

/// Parse one label line. Returns `None` unless the line has exactly five
/// whitespace-separated tokens that all parse as finite numbers.
pub fn parse_label_line(line: &str) -> Option<LabelRecord> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() != 5 {
        return None;
    }
    let mut values = [0f64; 5];
    for (slot, token) in values.iter_mut().zip(&tokens) {
        let parsed: f64 = token.parse().ok()?;
        if !parsed.is_finite() {
            return None;
        }
        *slot = parsed;
    }
    Some(LabelRecord {
        class_id: values[0] as i64,
        bbox: NormBox {
            x_center: values[1],
            y_center: values[2],
            width: values[3],
            height: values[4],
        },
    })
}

/// Parse a whole label file, skipping blank and invalid lines.
pub fn parse_label_file(content: &str) -> Vec<LabelRecord> {
    content.lines().filter_map(parse_label_line).collect()
}

/// Parse a classes file: one name per line, blank lines dropped.
pub fn parse_classes_file(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Label filename for an image: the image extension replaced by `.txt`.
pub fn label_filename(image_name: &str) -> String {
    let path = Path::new(image_name);
    if has_image_extension(image_name) {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(image_name);
        format!("{stem}.txt")
    } else {
        format!("{image_name}.txt")
    }
}

/// Render `data.yaml`: train/val both point at the single exported split.
pub fn data_yaml(class_names: &[String]) -> String {
    let quoted: Vec<String> = class_names.iter().map(|n| format!("'{n}'")).collect();
    format!(
        "train: {IMAGES_SUBDIR}\nval: {IMAGES_SUBDIR}\nnc: {}\nnames: [{}]\n",
        class_names.len(),
        quoted.join(", ")
    )
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Export input for one image: where its pixel file lives, the name it is
/// published under, and its label lines.
#[derive(Debug, Clone)]
pub struct ExportImage {
    pub source_path: PathBuf,
    pub original_name: String,
    pub labels: Vec<LabelRecord>,
}

/// Counters from a completed export tree write.
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// Unique image paths written under `images/train`.
    pub images_exported: usize,
    /// Source files that were missing and skipped.
    pub images_skipped: usize,
}

/// Write the full export tree under `root`.
///
/// Missing source files are logged and skipped, never fatal. Duplicate
/// `original_name`s overwrite the earlier copy and count once in
/// `train.txt` (it is a set of paths, not a per-annotation list). An
/// export in which no image could be copied is rejected.
pub fn write_export_tree(
    root: &Path,
    images: &[ExportImage],
    class_names: &[String],
) -> Result<ExportSummary, CoreError> {
    let images_dir = root.join(IMAGES_SUBDIR);
    let labels_dir = root.join(LABELS_SUBDIR);
    fs::create_dir_all(&images_dir).map_err(internal)?;
    fs::create_dir_all(&labels_dir).map_err(internal)?;

    let mut train_paths: Vec<String> = Vec::new();
    let mut skipped = 0usize;

    for image in images {
        if !image.source_path.exists() {
            tracing::warn!(path = %image.source_path.display(), "Source image missing, skipped from export");
            skipped += 1;
            continue;
        }

        fs::copy(&image.source_path, images_dir.join(&image.original_name)).map_err(internal)?;

        let label_content: Vec<String> = image.labels.iter().map(format_label_line).collect();
        fs::write(
            labels_dir.join(label_filename(&image.original_name)),
            label_content.join("\n"),
        )
        .map_err(internal)?;

        let rel_path = format!("{IMAGES_SUBDIR}/{}", image.original_name);
        if !train_paths.contains(&rel_path) {
            train_paths.push(rel_path);
        }
    }

    if train_paths.is_empty() {
        return Err(CoreError::Validation(
            "No images could be exported".to_string(),
        ));
    }

    fs::write(root.join("train.txt"), train_paths.join("\n")).map_err(internal)?;
    fs::write(root.join("classes.txt"), class_names.join("\n")).map_err(internal)?;
    fs::write(root.join("data.yaml"), data_yaml(class_names)).map_err(internal)?;

    Ok(ExportSummary {
        images_exported: train_paths.len(),
        images_skipped: skipped,
    })
}

// ---------------------------------------------------------------------------
// Import
// ---------------------------------------------------------------------------

/// Located directories inside an extracted dataset archive.
#[derive(Debug, Clone)]
pub struct DatasetLayout {
    pub images_dir: PathBuf,
    pub labels_dir: PathBuf,
    pub classes_file: Option<PathBuf>,
}

/// Locate the images/labels directories and optional classes file inside
/// an extracted archive.
///
/// Best-effort name matching, kept deliberately loose: a top-level entry
/// whose lowercased name contains `image` (or equals `train`) is the
/// images directory; one containing `label` or `annotation` is the labels
/// directory; `classes.txt`/`names.txt` is the classes file. If either
/// directory has a nested `train/`, descend into it. Either directory
/// missing fails the import.
pub fn locate_dataset_layout(root: &Path) -> Result<DatasetLayout, CoreError> {
    let mut images_dir: Option<PathBuf> = None;
    let mut labels_dir: Option<PathBuf> = None;
    let mut classes_file: Option<PathBuf> = None;

    let mut entries: Vec<PathBuf> = fs::read_dir(root)
        .map_err(internal)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();

    for path in entries {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_lowercase();
        if name.contains("image") || name == "train" {
            images_dir = Some(path);
        } else if name.contains("label") || name.contains("annotation") {
            labels_dir = Some(path);
        } else if name == "classes.txt" || name == "names.txt" {
            classes_file = Some(path);
        }
    }

    let mut images_dir = images_dir
        .filter(|p| p.exists())
        .ok_or_else(|| CoreError::Validation("No images directory found in dataset".to_string()))?;
    let mut labels_dir = labels_dir
        .filter(|p| p.exists())
        .ok_or_else(|| CoreError::Validation("No labels directory found in dataset".to_string()))?;

    if images_dir.join("train").exists() {
        images_dir = images_dir.join("train");
    }
    if labels_dir.join("train").exists() {
        labels_dir = labels_dir.join("train");
    }

    Ok(DatasetLayout {
        images_dir,
        labels_dir,
        classes_file,
    })
}

/// One importable image: its source path, dimensions, and parsed labels.
#[derive(Debug, Clone)]
pub struct ScannedImage {
    pub path: PathBuf,
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub labels: Vec<LabelRecord>,
}

/// Result of scanning an extracted dataset: importable images, class
/// names from the optional classes file, and per-file error strings.
#[derive(Debug, Clone)]
pub struct DatasetScan {
    pub images: Vec<ScannedImage>,
    pub class_names: Vec<String>,
    pub errors: Vec<String>,
}

/// Scan a located dataset layout.
///
/// Image files are matched by extension, sorted by name. A file whose
/// dimensions cannot be read is recorded as an error and skipped; label
/// values are taken as-is with no range re-validation. Finding zero image
/// files at all is a validation error.
pub fn scan_dataset(layout: &DatasetLayout) -> Result<DatasetScan, CoreError> {
    let class_names = match &layout.classes_file {
        Some(path) => parse_classes_file(&fs::read_to_string(path).map_err(internal)?),
        None => Vec::new(),
    };

    let mut image_files: Vec<PathBuf> = fs::read_dir(&layout.images_dir)
        .map_err(internal)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| {
            path.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(has_image_extension)
        })
        .collect();
    image_files.sort();

    if image_files.is_empty() {
        return Err(CoreError::Validation(
            "No valid image files found in dataset".to_string(),
        ));
    }

    let mut images = Vec::new();
    let mut errors = Vec::new();

    for path in image_files {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default()
            .to_string();

        let dimensions = image::ImageReader::open(&path)
            .map_err(|e| e.to_string())
            .and_then(|reader| reader.with_guessed_format().map_err(|e| e.to_string()))
            .and_then(|reader| reader.into_dimensions().map_err(|e| e.to_string()));
        let (width, height) = match dimensions {
            Ok(dims) => dims,
            Err(_) => {
                errors.push(format!("Could not read dimensions for {file_name}"));
                continue;
            }
        };

        let label_path = layout.labels_dir.join(label_filename(&file_name));
        let labels = match fs::read_to_string(&label_path) {
            Ok(content) => parse_label_file(&content),
            Err(_) => Vec::new(),
        };

        images.push(ScannedImage {
            path,
            file_name,
            width,
            height,
            labels,
        });
    }

    Ok(DatasetScan {
        images,
        class_names,
        errors,
    })
}

fn internal(err: std::io::Error) -> CoreError {
    CoreError::Internal(err.to_string())
}
