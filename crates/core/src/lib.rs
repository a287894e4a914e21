//! Domain logic for the bounding-box dataset builder.
//!
//! Pure functions and small state machines shared by the API layer and
//! tests: coordinate transforms, the interactive box editor, class list
//! handling, annotation validation, the YOLO dataset codec, and storage
//! naming conventions. Nothing in here touches the database.

pub mod annotation;
pub mod classes;
pub mod dataset;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod storage;
pub mod types;
