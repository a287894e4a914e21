//! Database entity models and DTOs.

pub mod annotation;
pub mod image;
pub mod project;

pub use annotation::{Annotation, CreateAnnotation, UpdateAnnotation};
pub use image::{CreateImage, Image};
pub use project::{CreateProject, Project};
