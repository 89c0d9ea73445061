use serde::{Deserialize, Serialize};

use crate::constants::{MAX_NAME_LENGTH, MAX_UNIT_LENGTH};

/// Ingredient catalog entry stored in redb
///
/// Reference data: immutable once created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngredientRecord {
    pub name: String,
    /// Unit of measure, e.g. "g" or "ml"
    pub measurement_unit: String,
}

impl IngredientRecord {
    /// Validate an ingredient name: non-empty, within length limits
    pub fn validate_name(name: &str) -> bool {
        !name.trim().is_empty() && name.len() <= MAX_NAME_LENGTH
    }

    /// Validate a measurement unit: only the length is constrained,
    /// unit-less ingredients (e.g. "to taste") keep an empty string
    pub fn validate_unit(unit: &str) -> bool {
        unit.len() <= MAX_UNIT_LENGTH
    }
}
