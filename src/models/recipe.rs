use serde::{Deserialize, Serialize};

use crate::constants::{MIN_COOKING_TIME, MIN_INGREDIENT_AMOUNT};

/// Quantity of one ingredient within a recipe
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct IngredientAmount {
    pub ingredient_id: u64,
    pub amount: u32,
}

/// Recipe record stored in redb
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeRecord {
    pub author_id: u64,
    pub name: String,
    /// Opaque base64 image payload supplied by the client
    pub image: String,
    pub text: String,
    pub tag_ids: Vec<u64>,
    /// Ordered ingredient list; no ingredient appears twice
    pub ingredients: Vec<IngredientAmount>,
    /// Cooking time in minutes
    pub cooking_time: u32,
    /// Publication time (Unix timestamp); listings are newest-first
    pub pub_date: i64,
}

impl RecipeRecord {
    /// Validate a cooking time against the minimum
    pub fn validate_cooking_time(cooking_time: u32) -> bool {
        cooking_time >= MIN_COOKING_TIME
    }

    /// Validate an ingredient amount against the minimum
    pub fn validate_amount(amount: u32) -> bool {
        amount >= MIN_INGREDIENT_AMOUNT
    }

    /// Check whether any ingredient id appears more than once
    pub fn has_duplicate_ingredients(ingredients: &[IngredientAmount]) -> bool {
        for (i, entry) in ingredients.iter().enumerate() {
            if ingredients[..i]
                .iter()
                .any(|prev| prev.ingredient_id == entry.ingredient_id)
            {
                return true;
            }
        }
        false
    }
}
