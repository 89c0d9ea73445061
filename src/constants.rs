/// Maximum length for names (users, ingredients, tags, recipes)
pub const MAX_NAME_LENGTH: usize = 200;

/// Maximum length for an ingredient measurement unit
pub const MAX_UNIT_LENGTH: usize = 200;

/// Maximum length for recipe description text
pub const MAX_TEXT_LENGTH: usize = 200;

/// Maximum length for a tag color ("#RRGGBB")
pub const MAX_TAG_COLOR_LENGTH: usize = 7;

/// Minimum quantity of an ingredient within a recipe
pub const MIN_INGREDIENT_AMOUNT: u32 = 1;

/// Minimum cooking time in minutes
pub const MIN_COOKING_TIME: u32 = 1;

/// Download filename for the aggregated shopping list
pub const SHOPPING_LIST_FILENAME: &str = "wishlist.txt";

// =============================================================================
// Error Messages
// =============================================================================

/// Error message for ingredient amounts below the minimum
pub const ERR_AMOUNT_TOO_SMALL: &str = "Ingredient amount must be at least 1";

/// Error message for a repeated ingredient within one recipe
pub const ERR_DUPLICATE_INGREDIENT: &str = "Ingredient already added to this recipe";

/// Error message for cooking time below the minimum
pub const ERR_COOKING_TIME_TOO_SMALL: &str = "Cooking time must be at least 1 minute";
