//! HTTP request handlers, one module per resource.

pub mod annotation;
pub mod dataset;
pub mod image;
pub mod project;
pub mod thumbnail;
