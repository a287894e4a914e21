//! Table repositories. Each is a stateless namespace of query functions.

pub mod annotation_repo;
pub mod image_repo;
pub mod project_repo;

pub use annotation_repo::AnnotationRepo;
pub use image_repo::ImageRepo;
pub use project_repo::ProjectRepo;
