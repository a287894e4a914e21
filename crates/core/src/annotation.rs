//! Annotation validation.
//!
//! Applies on the create/update API path only. Dataset import deliberately
//! bypasses range validation and stores label values as-is.

use crate::error::CoreError;
use crate::geometry::NormBox;
use crate::types::DbId;

/// Validate a normalized bounding box and its class id before persisting.
///
/// All four geometry fields must be finite and within `[0, 1]`. The box is
/// allowed to extend past the image edge once half-width/half-height are
/// accounted for; only the raw fields are range-checked.
pub fn validate_normalized_box(class_id: DbId, bbox: &NormBox) -> Result<(), CoreError> {
    if class_id < 0 {
        return Err(CoreError::Validation(format!(
            "class_id must be non-negative, got {class_id}"
        )));
    }

    let fields = [
        ("x_center", bbox.x_center),
        ("y_center", bbox.y_center),
        ("width", bbox.width),
        ("height", bbox.height),
    ];
    for (name, value) in fields {
        if !value.is_finite() {
            return Err(CoreError::Validation(format!(
                "{name} must be a finite number"
            )));
        }
        if !(0.0..=1.0).contains(&value) {
            return Err(CoreError::Validation(format!(
                "{name} must be normalized between 0 and 1, got {value}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(xc: f64, yc: f64, w: f64, h: f64) -> NormBox {
        NormBox {
            x_center: xc,
            y_center: yc,
            width: w,
            height: h,
        }
    }

    #[test]
    fn in_range_box_accepted() {
        assert!(validate_normalized_box(0, &bbox(0.5, 0.5, 0.3, 0.4)).is_ok());
    }

    #[test]
    fn boundary_values_accepted() {
        assert!(validate_normalized_box(0, &bbox(0.0, 0.0, 0.0, 0.0)).is_ok());
        assert!(validate_normalized_box(0, &bbox(1.0, 1.0, 1.0, 1.0)).is_ok());
    }

    #[test]
    fn x_center_above_one_rejected() {
        let err = validate_normalized_box(0, &bbox(1.5, 0.5, 0.3, 0.4)).unwrap_err();
        assert!(err.to_string().contains("x_center"));
    }

    #[test]
    fn negative_width_rejected() {
        assert!(validate_normalized_box(0, &bbox(0.5, 0.5, -0.1, 0.4)).is_err());
    }

    #[test]
    fn nan_rejected() {
        assert!(validate_normalized_box(0, &bbox(f64::NAN, 0.5, 0.3, 0.4)).is_err());
    }

    #[test]
    fn negative_class_id_rejected() {
        assert!(validate_normalized_box(-1, &bbox(0.5, 0.5, 0.3, 0.4)).is_err());
    }

    #[test]
    fn box_overhanging_image_edge_accepted() {
        // Center near the edge with a large size: fields are in range even
        // though the box extends outside the image. Allowed.
        assert!(validate_normalized_box(0, &bbox(0.95, 0.95, 0.3, 0.3)).is_ok());
    }
}
