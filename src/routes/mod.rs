pub mod cart;
pub mod favorites;
pub mod health;
pub mod ingredients;
pub mod recipes;
pub mod subscriptions;
pub mod tags;
pub mod users;

pub use cart::{add_to_cart, download_shopping_cart, remove_from_cart};
pub use favorites::{add_favorite, remove_favorite};
pub use health::health_check;
pub use ingredients::{create_ingredient, get_ingredient, list_ingredients};
pub use recipes::{create_recipe, delete_recipe, get_recipe, list_recipes, update_recipe};
pub use subscriptions::{list_subscriptions, subscribe, unsubscribe};
pub use tags::{create_tag, get_tag, list_tags};
pub use users::{get_user, register_user};
