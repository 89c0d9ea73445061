use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use crate::constants::SHOPPING_LIST_FILENAME;
use crate::db::{self, tables};
use crate::error::{AppError, Result};
use crate::models::{IngredientRecord, RecipeRecord};
use crate::routes::recipes::RecipeSummary;
use crate::shopping_list::{self, ShoppingItem};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CartRequest {
    pub user_id: u64,
}

#[derive(Debug, Serialize)]
pub struct CartRemovedResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct DownloadParams {
    pub user_id: u64,
}

/// Add a recipe to the user's shopping cart
///
/// Returns 400 if the recipe is already in the cart.
pub async fn add_to_cart(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<CartRequest>,
) -> Result<(StatusCode, Json<RecipeSummary>)> {
    let db = state.db.clone();
    let user_id = payload.user_id;

    let summary = tokio::task::spawn_blocking(move || -> Result<RecipeSummary> {
        let write_txn = db.begin_write()?;
        let summary;
        {
            let users = write_txn.open_table(tables::USERS)?;
            if users.get(user_id)?.is_none() {
                return Err(AppError::UserNotFound);
            }

            let recipes = write_txn.open_table(tables::RECIPES)?;
            let record: RecipeRecord = recipes
                .get(id)?
                .map(|b| db::decode(b.value()))
                .transpose()?
                .ok_or(AppError::RecipeNotFound)?;

            let mut cart = write_txn.open_table(tables::CART_ENTRIES)?;
            if cart.get((user_id, id))?.is_some() {
                return Err(AppError::AlreadyInCart);
            }
            cart.insert((user_id, id), ())?;

            summary = RecipeSummary {
                id,
                name: record.name,
                image: record.image,
                cooking_time: record.cooking_time,
            };
        }
        write_txn.commit()?;

        tracing::info!("Recipe {} added to cart by user {}", id, user_id);
        Ok(summary)
    })
    .await??;

    Ok((StatusCode::CREATED, Json(summary)))
}

/// Remove a recipe from the user's shopping cart
///
/// Returns 404 if the recipe is not in the cart.
pub async fn remove_from_cart(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<CartRequest>,
) -> Result<Json<CartRemovedResponse>> {
    let db = state.db.clone();
    let user_id = payload.user_id;

    tokio::task::spawn_blocking(move || -> Result<()> {
        let write_txn = db.begin_write()?;
        {
            let mut cart = write_txn.open_table(tables::CART_ENTRIES)?;
            if cart.remove((user_id, id))?.is_none() {
                return Err(AppError::NotInCart);
            }
        }
        write_txn.commit()?;

        tracing::info!("Recipe {} removed from cart by user {}", id, user_id);
        Ok(())
    })
    .await??;

    Ok(Json(CartRemovedResponse {
        success: true,
        message: "Recipe removed from shopping cart".to_string(),
    }))
}

/// Download the aggregated shopping list as a plain-text attachment
///
/// Walks every recipe in the user's cart, merges ingredient quantities by
/// name and returns one line per ingredient. An empty cart yields an empty
/// file.
pub async fn download_shopping_cart(
    State(state): State<AppState>,
    Query(params): Query<DownloadParams>,
) -> Result<impl IntoResponse> {
    let db = state.db.clone();
    let user_id = params.user_id;

    let body = tokio::task::spawn_blocking(move || -> Result<String> {
        let read_txn = db.begin_read()?;

        let users = read_txn.open_table(tables::USERS)?;
        if users.get(user_id)?.is_none() {
            return Err(AppError::UserNotFound);
        }

        let cart = read_txn.open_table(tables::CART_ENTRIES)?;
        let mut recipe_ids = Vec::new();
        for entry in cart.range((user_id, 0)..=(user_id, u64::MAX))? {
            let (key, _) = entry?;
            recipe_ids.push(key.value().1);
        }

        let recipes = read_txn.open_table(tables::RECIPES)?;
        let catalog = read_txn.open_table(tables::INGREDIENTS)?;

        let mut entries: Vec<ShoppingItem> = Vec::new();
        for recipe_id in recipe_ids {
            let record: RecipeRecord = recipes
                .get(recipe_id)?
                .map(|b| db::decode(b.value()))
                .transpose()?
                .ok_or(AppError::RecipeNotFound)?;

            for entry in &record.ingredients {
                let ingredient: IngredientRecord = catalog
                    .get(entry.ingredient_id)?
                    .map(|b| db::decode(b.value()))
                    .transpose()?
                    .ok_or(AppError::IngredientNotFound)?;

                entries.push(ShoppingItem {
                    name: ingredient.name,
                    measurement_unit: ingredient.measurement_unit,
                    amount: u64::from(entry.amount),
                });
            }
        }

        let items = shopping_list::aggregate(entries);
        Ok(shopping_list::render(&items))
    })
    .await??;

    tracing::info!(
        "Shopping list downloaded by user {}: {} bytes",
        user_id,
        body.len()
    );

    let headers = [
        (
            header::CONTENT_TYPE,
            "text/plain; charset=utf-8".to_string(),
        ),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", SHOPPING_LIST_FILENAME),
        ),
    ];

    Ok((headers, body))
}
