pub mod ingredient;
pub mod recipe;
pub mod tag;
pub mod user;

pub use ingredient::IngredientRecord;
pub use recipe::{IngredientAmount, RecipeRecord};
pub use tag::TagRecord;
pub use user::UserRecord;
