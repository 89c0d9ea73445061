use redb::TableDefinition;

/// Users table: user_id -> UserRecord (serialized)
pub const USERS: TableDefinition<u64, &[u8]> = TableDefinition::new("users");

/// Username index: username -> user_id
/// Enforces username uniqueness at registration
pub const USERNAMES: TableDefinition<&str, u64> = TableDefinition::new("usernames");

/// Ingredient catalog: ingredient_id -> IngredientRecord (serialized)
pub const INGREDIENTS: TableDefinition<u64, &[u8]> = TableDefinition::new("ingredients");

/// Tags table: tag_id -> TagRecord (serialized)
pub const TAGS: TableDefinition<u64, &[u8]> = TableDefinition::new("tags");

/// Recipes table: recipe_id -> RecipeRecord (serialized)
pub const RECIPES: TableDefinition<u64, &[u8]> = TableDefinition::new("recipes");

/// Favorites: (user_id, recipe_id) -> ()
/// Per-user enumeration is a key range scan over (user_id, ..)
pub const FAVORITES: TableDefinition<(u64, u64), ()> = TableDefinition::new("favorites");

/// Shopping cart entries: (user_id, recipe_id) -> ()
pub const CART_ENTRIES: TableDefinition<(u64, u64), ()> = TableDefinition::new("cart_entries");

/// Author subscriptions: (follower_id, author_id) -> ()
pub const SUBSCRIPTIONS: TableDefinition<(u64, u64), ()> = TableDefinition::new("subscriptions");

/// Id sequences: entity name -> last allocated id
pub const NEXT_IDS: TableDefinition<&str, u64> = TableDefinition::new("next_ids");
