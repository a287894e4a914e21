//! Box coordinate transforms.
//!
//! Annotations are stored normalized (YOLO-style): center point and size,
//! each divided by the image dimension, so every field lives in `[0, 1]`.
//! The canvas editor works in pixel space (top-left origin + size). The two
//! conversions here are exact inverses up to floating-point rounding; any
//! clamping is the caller's responsibility.

use serde::{Deserialize, Serialize};

/// A box in normalized coordinates: center `(xc, yc)` and size `(w, h)`,
/// all relative to the image dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormBox {
    pub x_center: f64,
    pub y_center: f64,
    pub width: f64,
    pub height: f64,
}

/// A box in image-pixel coordinates: top-left origin `(x, y)` and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormBox {
    /// Convert to pixel space against image dimensions `(image_w, image_h)`.
    pub fn to_pixel(&self, image_w: f64, image_h: f64) -> PixelBox {
        PixelBox {
            x: (self.x_center - self.width / 2.0) * image_w,
            y: (self.y_center - self.height / 2.0) * image_h,
            width: self.width * image_w,
            height: self.height * image_h,
        }
    }
}

impl PixelBox {
    /// Convert to normalized space against image dimensions `(image_w, image_h)`.
    pub fn to_normalized(&self, image_w: f64, image_h: f64) -> NormBox {
        NormBox {
            x_center: (self.x + self.width / 2.0) / image_w,
            y_center: (self.y + self.height / 2.0) / image_h,
            width: self.width / image_w,
            height: self.height / image_h,
        }
    }

    /// Whether a point lies inside this box (edges inclusive).
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }
}
