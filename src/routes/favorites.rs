use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use crate::db::{self, tables};
use crate::error::{AppError, Result};
use crate::models::RecipeRecord;
use crate::routes::recipes::RecipeSummary;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct FavoriteRequest {
    pub user_id: u64,
}

#[derive(Debug, Serialize)]
pub struct FavoriteRemovedResponse {
    pub success: bool,
    pub message: String,
}

/// Add a recipe to the user's favorites
///
/// Returns 400 if the recipe is already favorited.
pub async fn add_favorite(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<FavoriteRequest>,
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

            let mut favorites = write_txn.open_table(tables::FAVORITES)?;
            if favorites.get((user_id, id))?.is_some() {
                return Err(AppError::AlreadyFavorited);
            }
            favorites.insert((user_id, id), ())?;

            summary = RecipeSummary {
                id,
                name: record.name,
                image: record.image,
                cooking_time: record.cooking_time,
            };
        }
        write_txn.commit()?;

        tracing::info!("Recipe {} favorited by user {}", id, user_id);
        Ok(summary)
    })
    .await??;

    Ok((StatusCode::CREATED, Json(summary)))
}

/// Remove a recipe from the user's favorites
///
/// Returns 404 if the recipe is not in the favorites.
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<FavoriteRequest>,
) -> Result<Json<FavoriteRemovedResponse>> {
    let db = state.db.clone();
    let user_id = payload.user_id;

    tokio::task::spawn_blocking(move || -> Result<()> {
        let write_txn = db.begin_write()?;
        {
            let mut favorites = write_txn.open_table(tables::FAVORITES)?;
            if favorites.remove((user_id, id))?.is_none() {
                return Err(AppError::NotFavorited);
            }
        }
        write_txn.commit()?;

        tracing::info!("Recipe {} unfavorited by user {}", id, user_id);
        Ok(())
    })
    .await??;

    Ok(Json(FavoriteRemovedResponse {
        success: true,
        message: "Recipe removed from favorites".to_string(),
    }))
}
