use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use crate::db::{self, tables};
use crate::error::{AppError, Result};
use crate::models::{RecipeRecord, UserRecord};
use crate::routes::recipes::RecipeSummary;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    /// The follower's user id
    pub user_id: u64,
}

#[derive(Debug, Serialize)]
pub struct SubscribeResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct SubscriptionListParams {
    pub user_id: u64,
}

/// One subscribed author with their published recipes
#[derive(Debug, Serialize)]
pub struct SubscriptionEntry {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub recipes: Vec<RecipeSummary>,
    pub recipe_count: usize,
}

/// Subscribe the requesting user to an author
///
/// Self-subscription and duplicate subscriptions are rejected with 400.
pub async fn subscribe(
    State(state): State<AppState>,
    Path(author_id): Path<u64>,
    Json(payload): Json<SubscribeRequest>,
) -> Result<(StatusCode, Json<SubscribeResponse>)> {
    if payload.user_id == author_id {
        return Err(AppError::SelfSubscription);
    }

    let db = state.db.clone();
    let follower_id = payload.user_id;

    tokio::task::spawn_blocking(move || -> Result<()> {
        let write_txn = db.begin_write()?;
        {
            let users = write_txn.open_table(tables::USERS)?;
            if users.get(follower_id)?.is_none() || users.get(author_id)?.is_none() {
                return Err(AppError::UserNotFound);
            }

            let mut subscriptions = write_txn.open_table(tables::SUBSCRIPTIONS)?;
            if subscriptions.get((follower_id, author_id))?.is_some() {
                return Err(AppError::AlreadySubscribed);
            }
            subscriptions.insert((follower_id, author_id), ())?;
        }
        write_txn.commit()?;

        tracing::info!("User {} subscribed to author {}", follower_id, author_id);
        Ok(())
    })
    .await??;

    Ok((
        StatusCode::CREATED,
        Json(SubscribeResponse {
            success: true,
            message: "Subscription created".to_string(),
        }),
    ))
}

/// Unsubscribe the requesting user from an author
///
/// Returns 404 if no such subscription exists.
pub async fn unsubscribe(
    State(state): State<AppState>,
    Path(author_id): Path<u64>,
    Json(payload): Json<SubscribeRequest>,
) -> Result<Json<SubscribeResponse>> {
    let db = state.db.clone();
    let follower_id = payload.user_id;

    tokio::task::spawn_blocking(move || -> Result<()> {
        let write_txn = db.begin_write()?;
        {
            let mut subscriptions = write_txn.open_table(tables::SUBSCRIPTIONS)?;
            if subscriptions.remove((follower_id, author_id))?.is_none() {
                return Err(AppError::NotSubscribed);
            }
        }
        write_txn.commit()?;

        tracing::info!("User {} unsubscribed from author {}", follower_id, author_id);
        Ok(())
    })
    .await??;

    Ok(Json(SubscribeResponse {
        success: true,
        message: "Subscription removed".to_string(),
    }))
}

/// List the authors the user follows, each with their published recipes
///
/// Recipes per author are ordered oldest first.
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Query(params): Query<SubscriptionListParams>,
) -> Result<Json<Vec<SubscriptionEntry>>> {
    let db = state.db.clone();
    let follower_id = params.user_id;

    let entries = tokio::task::spawn_blocking(move || -> Result<Vec<SubscriptionEntry>> {
        let read_txn = db.begin_read()?;

        let users = read_txn.open_table(tables::USERS)?;
        if users.get(follower_id)?.is_none() {
            return Err(AppError::UserNotFound);
        }

        let subscriptions = read_txn.open_table(tables::SUBSCRIPTIONS)?;
        let mut author_ids = Vec::new();
        for entry in subscriptions.range((follower_id, 0)..=(follower_id, u64::MAX))? {
            let (key, _) = entry?;
            author_ids.push(key.value().1);
        }

        let recipes = read_txn.open_table(tables::RECIPES)?;
        let mut entries = Vec::with_capacity(author_ids.len());
        for author_id in author_ids {
            let author: UserRecord = users
                .get(author_id)?
                .map(|b| db::decode(b.value()))
                .transpose()?
                .ok_or(AppError::UserNotFound)?;

            let mut authored: Vec<(u64, RecipeRecord)> = Vec::new();
            for entry in recipes.iter()? {
                let (key, value) = entry?;
                let record: RecipeRecord = db::decode(value.value())?;
                if record.author_id == author_id {
                    authored.push((key.value(), record));
                }
            }
            authored.sort_by(|a, b| a.1.pub_date.cmp(&b.1.pub_date).then(a.0.cmp(&b.0)));

            let recipe_count = authored.len();
            let summaries = authored
                .into_iter()
                .map(|(id, record)| RecipeSummary {
                    id,
                    name: record.name,
                    image: record.image,
                    cooking_time: record.cooking_time,
                })
                .collect();

            entries.push(SubscriptionEntry {
                id: author_id,
                username: author.username,
                email: author.email,
                first_name: author.first_name,
                last_name: author.last_name,
                recipes: summaries,
                recipe_count,
            });
        }

        Ok(entries)
    })
    .await??;

    Ok(Json(entries))
}
