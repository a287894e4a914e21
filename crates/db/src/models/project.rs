//! Project entity model and DTOs.

use boxlab_core::classes::ClassDefinition;
use boxlab_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A project row from the `projects` table.
///
/// `class_definitions` is the full positional class list stored as a
/// JSONB document; class ids are list positions.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub class_definitions: Json<Vec<ClassDefinition>>,
    pub created_at: Timestamp,
}

impl Project {
    /// Class names in positional order.
    pub fn class_names(&self) -> Vec<String> {
        self.class_definitions
            .iter()
            .map(|c| c.name.clone())
            .collect()
    }
}

/// DTO for creating a new project.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProject {
    pub name: String,
    /// Class names in order. Ids and colors are derived from positions.
    #[serde(default)]
    pub classes: Vec<String>,
}
