//! Object class definitions.
//!
//! Class identity is purely positional: a project's class list is replaced
//! wholesale, and each entry's id is its index in the new list. Annotations
//! keep whatever `class_id` they were created with; replacing the list does
//! not remap them.

use serde::{Deserialize, Serialize};
use crate::error::CoreError;

/// Golden-angle hue step, spreads consecutive class colors apart.
const HUE_STEP: f64 = 137.5;

/// One object class in a project's class list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    /// Position in the class list; reassigned whenever the list is replaced.
    pub id: i64,
    pub name: String,
    /// CSS color string, derived from the position via [`class_color`].
    pub color: String,
}

/// Deterministic display color for the class at `index`:
/// hue `(index * 137.5) mod 360`, saturation 70%, lightness 50%.
pub fn class_color(index: usize) -> String {
    let hue = (index as f64 * HUE_STEP) % 360.0;
    format!("hsl({hue}, 70%, 50%)")
}

/// Build the full class list for a sequence of names, assigning positional
/// ids and derived colors.
pub fn build_class_definitions(names: &[String]) -> Vec<ClassDefinition> {
    names
        .iter()
        .enumerate()
        .map(|(index, name)| ClassDefinition {
            id: index as i64,
            name: name.clone(),
            color: class_color(index),
        })
        .collect()
}

/// Validate a class-name list before building definitions: every entry
/// must be non-blank.
pub fn validate_class_names(names: &[String]) -> Result<(), CoreError> {
    for (index, name) in names.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(CoreError::Validation(format!(
                "class name at index {index} must not be blank"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_three_hues_follow_golden_angle() {
        assert_eq!(class_color(0), "hsl(0, 70%, 50%)");
        assert_eq!(class_color(1), "hsl(137.5, 70%, 50%)");
        assert_eq!(class_color(2), "hsl(275, 70%, 50%)");
    }

    #[test]
    fn hue_wraps_at_360() {
        // index 3: 412.5 mod 360 = 52.5
        assert_eq!(class_color(3), "hsl(52.5, 70%, 50%)");
    }

    #[test]
    fn definitions_get_positional_ids() {
        let names = vec!["cat".to_string(), "dog".to_string()];
        let defs = build_class_definitions(&names);
        assert_eq!(defs.len(), 2);
        assert_eq!(defs[0].id, 0);
        assert_eq!(defs[0].name, "cat");
        assert_eq!(defs[0].color, "hsl(0, 70%, 50%)");
        assert_eq!(defs[1].id, 1);
        assert_eq!(defs[1].name, "dog");
        assert_eq!(defs[1].color, "hsl(137.5, 70%, 50%)");
    }

    #[test]
    fn replacing_list_renumbers_from_zero() {
        let defs = build_class_definitions(&["dog".to_string()]);
        assert_eq!(defs[0].id, 0);
        assert_eq!(defs[0].name, "dog");
    }

    #[test]
    fn blank_class_name_rejected() {
        let names = vec!["cat".to_string(), "  ".to_string()];
        assert!(validate_class_names(&names).is_err());
        assert!(validate_class_names(&["cat".to_string()]).is_ok());
    }

    #[test]
    fn empty_list_is_valid() {
        assert!(validate_class_names(&[]).is_ok());
        assert!(build_class_definitions(&[]).is_empty());
    }
}
