use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use redb::{ReadTransaction, ReadableTable};
use serde::{Deserialize, Serialize};

use crate::constants::{ERR_AMOUNT_TOO_SMALL, ERR_COOKING_TIME_TOO_SMALL,
    ERR_DUPLICATE_INGREDIENT, MAX_NAME_LENGTH, MAX_TEXT_LENGTH};
use crate::db::{self, tables};
use crate::error::{AppError, Result};
use crate::models::{IngredientAmount, IngredientRecord, RecipeRecord, TagRecord, UserRecord};
use crate::routes::tags::TagResponse;
use crate::routes::users::{build_user_profile, UserProfile};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct IngredientAmountRequest {
    /// Catalog ingredient id
    pub id: u64,
    pub amount: u32,
}

/// Body for recipe create and update
///
/// `user_id` identifies the acting user; updates are author-only.
#[derive(Debug, Deserialize)]
pub struct RecipeRequest {
    pub user_id: u64,
    pub name: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tags: Vec<u64>,
    #[serde(default)]
    pub ingredients: Vec<IngredientAmountRequest>,
    pub cooking_time: u32,
}

#[derive(Debug, Serialize)]
pub struct RecipeIngredientLine {
    pub id: u64,
    pub name: String,
    pub measurement_unit: String,
    pub amount: u32,
}

#[derive(Debug, Serialize)]
pub struct RecipeResponse {
    pub id: u64,
    pub name: String,
    pub author: UserProfile,
    pub image: String,
    pub text: String,
    pub tags: Vec<TagResponse>,
    pub ingredients: Vec<RecipeIngredientLine>,
    pub cooking_time: u32,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Compact recipe representation for favorites, cart and subscription listings
#[derive(Debug, Serialize)]
pub struct RecipeSummary {
    pub id: u64,
    pub name: String,
    pub image: String,
    pub cooking_time: u32,
}

#[derive(Debug, Deserialize)]
pub struct RecipeListParams {
    /// Filter by author id
    pub author: Option<u64>,
    /// Filter by tag slug
    pub tags: Option<String>,
    /// Requesting user, drives is_favorited / is_in_shopping_cart
    pub user_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRecipeRequest {
    pub user_id: u64,
}

#[derive(Debug, Serialize)]
pub struct DeleteRecipeResponse {
    pub success: bool,
    pub message: String,
}

/// Validate the request body invariants that need no table lookups
fn validate_recipe_payload(payload: &RecipeRequest) -> Result<Vec<IngredientAmount>> {
    if payload.name.trim().is_empty() || payload.name.len() > MAX_NAME_LENGTH {
        return Err(AppError::InvalidInput(
            "Recipe name must be non-empty".to_string(),
        ));
    }

    if payload.text.len() > MAX_TEXT_LENGTH {
        return Err(AppError::InvalidInput(
            "Recipe text is too long".to_string(),
        ));
    }

    if !RecipeRecord::validate_cooking_time(payload.cooking_time) {
        return Err(AppError::InvalidInput(ERR_COOKING_TIME_TOO_SMALL.to_string()));
    }

    let ingredients: Vec<IngredientAmount> = payload
        .ingredients
        .iter()
        .map(|entry| IngredientAmount {
            ingredient_id: entry.id,
            amount: entry.amount,
        })
        .collect();

    if ingredients
        .iter()
        .any(|entry| !RecipeRecord::validate_amount(entry.amount))
    {
        return Err(AppError::InvalidInput(ERR_AMOUNT_TOO_SMALL.to_string()));
    }

    if RecipeRecord::has_duplicate_ingredients(&ingredients) {
        return Err(AppError::InvalidInput(ERR_DUPLICATE_INGREDIENT.to_string()));
    }

    Ok(ingredients)
}

/// Verify that every referenced tag and ingredient exists
///
/// Runs inside the write transaction so the references cannot go stale before
/// the recipe is committed.
fn check_references(
    write_txn: &redb::WriteTransaction,
    author_id: u64,
    tag_ids: &[u64],
    ingredients: &[IngredientAmount],
) -> Result<()> {
    let users = write_txn.open_table(tables::USERS)?;
    if users.get(author_id)?.is_none() {
        return Err(AppError::UserNotFound);
    }

    let tags = write_txn.open_table(tables::TAGS)?;
    for &tag_id in tag_ids {
        if tags.get(tag_id)?.is_none() {
            return Err(AppError::TagNotFound);
        }
    }

    let catalog = write_txn.open_table(tables::INGREDIENTS)?;
    for entry in ingredients {
        if catalog.get(entry.ingredient_id)?.is_none() {
            return Err(AppError::IngredientNotFound);
        }
    }

    Ok(())
}

/// Build the full recipe representation within an open read transaction
pub(crate) fn build_recipe_response(
    read_txn: &ReadTransaction,
    recipe_id: u64,
    record: &RecipeRecord,
    viewer: Option<u64>,
) -> Result<RecipeResponse> {
    let users = read_txn.open_table(tables::USERS)?;
    let author_record: UserRecord = users
        .get(record.author_id)?
        .map(|b| db::decode(b.value()))
        .transpose()?
        .ok_or(AppError::UserNotFound)?;
    let author = build_user_profile(read_txn, record.author_id, &author_record, viewer)?;

    let tags_table = read_txn.open_table(tables::TAGS)?;
    let mut tag_responses = Vec::with_capacity(record.tag_ids.len());
    for &tag_id in &record.tag_ids {
        let tag: TagRecord = tags_table
            .get(tag_id)?
            .map(|b| db::decode(b.value()))
            .transpose()?
            .ok_or(AppError::TagNotFound)?;
        tag_responses.push(TagResponse {
            id: tag_id,
            name: tag.name,
            color: tag.color,
            slug: tag.slug,
        });
    }

    let catalog = read_txn.open_table(tables::INGREDIENTS)?;
    let mut ingredient_lines = Vec::with_capacity(record.ingredients.len());
    for entry in &record.ingredients {
        let ingredient: IngredientRecord = catalog
            .get(entry.ingredient_id)?
            .map(|b| db::decode(b.value()))
            .transpose()?
            .ok_or(AppError::IngredientNotFound)?;
        ingredient_lines.push(RecipeIngredientLine {
            id: entry.ingredient_id,
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
            amount: entry.amount,
        });
    }

    let (is_favorited, is_in_shopping_cart) = match viewer {
        Some(viewer_id) => {
            let favorites = read_txn.open_table(tables::FAVORITES)?;
            let cart = read_txn.open_table(tables::CART_ENTRIES)?;
            (
                favorites.get((viewer_id, recipe_id))?.is_some(),
                cart.get((viewer_id, recipe_id))?.is_some(),
            )
        }
        None => (false, false),
    };

    Ok(RecipeResponse {
        id: recipe_id,
        name: record.name.clone(),
        author,
        image: record.image.clone(),
        text: record.text.clone(),
        tags: tag_responses,
        ingredients: ingredient_lines,
        cooking_time: record.cooking_time,
        is_favorited,
        is_in_shopping_cart,
    })
}

/// Load a recipe record or fail with 404
pub(crate) fn load_recipe(read_txn: &ReadTransaction, recipe_id: u64) -> Result<RecipeRecord> {
    let recipes = read_txn.open_table(tables::RECIPES)?;
    recipes
        .get(recipe_id)?
        .map(|b| db::decode(b.value()))
        .transpose()?
        .ok_or(AppError::RecipeNotFound)
}

/// Publish a new recipe
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(payload): Json<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>)> {
    let ingredients = validate_recipe_payload(&payload)?;

    let record = RecipeRecord {
        author_id: payload.user_id,
        name: payload.name.clone(),
        image: payload.image.clone(),
        text: payload.text.clone(),
        tag_ids: payload.tags.clone(),
        ingredients,
        cooking_time: payload.cooking_time,
        pub_date: Utc::now().timestamp(),
    };

    let db = state.db.clone();
    let viewer = Some(payload.user_id);

    let response = tokio::task::spawn_blocking(move || -> Result<RecipeResponse> {
        let id;
        {
            let write_txn = db.begin_write()?;
            check_references(
                &write_txn,
                record.author_id,
                &record.tag_ids,
                &record.ingredients,
            )?;

            id = db::next_id(&write_txn, "recipes")?;
            {
                let mut recipes = write_txn.open_table(tables::RECIPES)?;
                let bytes = db::encode(&record)?;
                recipes.insert(id, bytes.as_slice())?;
            }
            write_txn.commit()?;
        }

        tracing::info!("Recipe created: {} (id {})", record.name, id);

        let read_txn = db.begin_read()?;
        build_recipe_response(&read_txn, id, &record, viewer)
    })
    .await??;

    Ok((StatusCode::CREATED, Json(response)))
}

/// List recipes, newest first, optionally filtered by author and tag slug
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(params): Query<RecipeListParams>,
) -> Result<Json<Vec<RecipeResponse>>> {
    let db = state.db.clone();

    let responses = tokio::task::spawn_blocking(move || -> Result<Vec<RecipeResponse>> {
        let read_txn = db.begin_read()?;

        // Resolve the tag slug filter first; an unknown slug matches nothing
        let tag_filter = match &params.tags {
            Some(slug) => {
                let tags_table = read_txn.open_table(tables::TAGS)?;
                let mut found = None;
                for entry in tags_table.iter()? {
                    let (key, value) = entry?;
                    let tag: TagRecord = db::decode(value.value())?;
                    if tag.slug == *slug {
                        found = Some(key.value());
                        break;
                    }
                }
                match found {
                    Some(id) => Some(id),
                    None => return Ok(Vec::new()),
                }
            }
            None => None,
        };

        let recipes = read_txn.open_table(tables::RECIPES)?;
        let mut selected: Vec<(u64, RecipeRecord)> = Vec::new();
        for entry in recipes.iter()? {
            let (key, value) = entry?;
            let record: RecipeRecord = db::decode(value.value())?;

            if let Some(author) = params.author {
                if record.author_id != author {
                    continue;
                }
            }
            if let Some(tag_id) = tag_filter {
                if !record.tag_ids.contains(&tag_id) {
                    continue;
                }
            }

            selected.push((key.value(), record));
        }

        // Newest first, id as tie-break
        selected.sort_by(|a, b| b.1.pub_date.cmp(&a.1.pub_date).then(b.0.cmp(&a.0)));

        let mut responses = Vec::with_capacity(selected.len());
        for (id, record) in &selected {
            responses.push(build_recipe_response(&read_txn, *id, record, params.user_id)?);
        }

        Ok(responses)
    })
    .await??;

    Ok(Json(responses))
}

/// Fetch a single recipe
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(params): Query<RecipeListParams>,
) -> Result<Json<RecipeResponse>> {
    let db = state.db.clone();

    let response = tokio::task::spawn_blocking(move || -> Result<RecipeResponse> {
        let read_txn = db.begin_read()?;
        let record = load_recipe(&read_txn, id)?;
        build_recipe_response(&read_txn, id, &record, params.user_id)
    })
    .await??;

    Ok(Json(response))
}

/// Replace a recipe's content
///
/// Only the author may update; the original author and publication date are
/// kept.
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<RecipeRequest>,
) -> Result<Json<RecipeResponse>> {
    let ingredients = validate_recipe_payload(&payload)?;

    let db = state.db.clone();
    let viewer = Some(payload.user_id);

    let response = tokio::task::spawn_blocking(move || -> Result<RecipeResponse> {
        let record;
        {
            let write_txn = db.begin_write()?;

            let existing: RecipeRecord = {
                let recipes = write_txn.open_table(tables::RECIPES)?;
                let existing = recipes
                    .get(id)?
                    .map(|b| db::decode(b.value()))
                    .transpose()?
                    .ok_or(AppError::RecipeNotFound)?;
                existing
            };

            if existing.author_id != payload.user_id {
                tracing::warn!(
                    "User {} attempted to update recipe {} owned by {}",
                    payload.user_id,
                    id,
                    existing.author_id
                );
                return Err(AppError::NotRecipeAuthor);
            }

            check_references(&write_txn, existing.author_id, &payload.tags, &ingredients)?;

            record = RecipeRecord {
                author_id: existing.author_id,
                name: payload.name.clone(),
                image: payload.image.clone(),
                text: payload.text.clone(),
                tag_ids: payload.tags.clone(),
                ingredients,
                cooking_time: payload.cooking_time,
                pub_date: existing.pub_date,
            };

            {
                let mut recipes = write_txn.open_table(tables::RECIPES)?;
                let bytes = db::encode(&record)?;
                recipes.insert(id, bytes.as_slice())?;
            }
            write_txn.commit()?;
        }

        tracing::info!("Recipe updated: {} (id {})", record.name, id);

        let read_txn = db.begin_read()?;
        build_recipe_response(&read_txn, id, &record, viewer)
    })
    .await??;

    Ok(Json(response))
}

/// Delete a recipe and cascade its favorite and cart entries
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<DeleteRecipeRequest>,
) -> Result<Json<DeleteRecipeResponse>> {
    let db = state.db.clone();

    tokio::task::spawn_blocking(move || -> Result<()> {
        let write_txn = db.begin_write()?;
        {
            let mut recipes = write_txn.open_table(tables::RECIPES)?;
            let existing: RecipeRecord = recipes
                .get(id)?
                .map(|b| db::decode(b.value()))
                .transpose()?
                .ok_or(AppError::RecipeNotFound)?;

            if existing.author_id != payload.user_id {
                tracing::warn!(
                    "User {} attempted to delete recipe {} owned by {}",
                    payload.user_id,
                    id,
                    existing.author_id
                );
                return Err(AppError::NotRecipeAuthor);
            }

            recipes.remove(id)?;

            // Cascade: drop every favorite and cart entry referencing the recipe
            let mut favorites = write_txn.open_table(tables::FAVORITES)?;
            let mut stale = Vec::new();
            for entry in favorites.iter()? {
                let (key, _) = entry?;
                let (user_id, recipe_id) = key.value();
                if recipe_id == id {
                    stale.push((user_id, recipe_id));
                }
            }
            for key in stale {
                favorites.remove(key)?;
            }

            let mut cart = write_txn.open_table(tables::CART_ENTRIES)?;
            let mut stale = Vec::new();
            for entry in cart.iter()? {
                let (key, _) = entry?;
                let (user_id, recipe_id) = key.value();
                if recipe_id == id {
                    stale.push((user_id, recipe_id));
                }
            }
            for key in stale {
                cart.remove(key)?;
            }
        }
        write_txn.commit()?;

        tracing::info!("Recipe deleted (id {})", id);
        Ok(())
    })
    .await??;

    Ok(Json(DeleteRecipeResponse {
        success: true,
        message: "Recipe deleted".to_string(),
    }))
}
