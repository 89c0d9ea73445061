use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use redb::{ReadTransaction, ReadableTable};
use serde::{Deserialize, Serialize};

use crate::db::{self, tables};
use crate::error::{AppError, Result};
use crate::models::UserRecord;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterUserResponse {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

/// User profile as embedded in API responses
///
/// `is_subscribed` is relative to the requesting user and false when the
/// request carries no identity.
#[derive(Debug, Serialize)]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_subscribed: bool,
}

/// Optional requesting-user identity passed in the query string
#[derive(Debug, Deserialize)]
pub struct ViewerParams {
    pub user_id: Option<u64>,
}

/// Build a user profile within an open read transaction
pub(crate) fn build_user_profile(
    read_txn: &ReadTransaction,
    user_id: u64,
    record: &UserRecord,
    viewer: Option<u64>,
) -> Result<UserProfile> {
    let is_subscribed = match viewer {
        Some(viewer_id) => {
            let subscriptions = read_txn.open_table(tables::SUBSCRIPTIONS)?;
            subscriptions.get((viewer_id, user_id))?.is_some()
        }
        None => false,
    };

    Ok(UserProfile {
        id: user_id,
        username: record.username.clone(),
        email: record.email.clone(),
        first_name: record.first_name.clone(),
        last_name: record.last_name.clone(),
        is_subscribed,
    })
}

/// Register a new user
///
/// Usernames are unique; registration does not create a session (there is no
/// authentication layer, handlers take the acting user id explicitly).
///
/// Returns 409 Conflict if the username is already taken.
pub async fn register_user(
    State(state): State<AppState>,
    Json(payload): Json<RegisterUserRequest>,
) -> Result<(StatusCode, Json<RegisterUserResponse>)> {
    if !UserRecord::validate_username(&payload.username) {
        tracing::warn!("Invalid username: {}", payload.username);
        return Err(AppError::InvalidInput(
            "Username must be non-empty and contain only letters, digits, '_', '-' or '.'"
                .to_string(),
        ));
    }

    if !UserRecord::validate_email(&payload.email) {
        return Err(AppError::InvalidInput("Invalid email address".to_string()));
    }

    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "First and last name must not be blank".to_string(),
        ));
    }

    let db = state.db.clone();
    let username = payload.username.clone();

    let record = UserRecord {
        username: payload.username.clone(),
        email: payload.email.clone(),
        first_name: payload.first_name.clone(),
        last_name: payload.last_name.clone(),
        created_at: Utc::now().timestamp(),
    };

    let id = tokio::task::spawn_blocking(move || -> Result<u64> {
        let write_txn = db.begin_write()?;
        let id;
        {
            let mut usernames = write_txn.open_table(tables::USERNAMES)?;
            if usernames.get(username.as_str())?.is_some() {
                tracing::info!("Username already taken: {}", username);
                return Err(AppError::UserAlreadyExists);
            }

            id = db::next_id(&write_txn, "users")?;
            usernames.insert(username.as_str(), id)?;

            let mut users = write_txn.open_table(tables::USERS)?;
            let bytes = db::encode(&record)?;
            users.insert(id, bytes.as_slice())?;
        }
        write_txn.commit()?;

        tracing::info!("New user registered: {} (id {})", username, id);
        Ok(id)
    })
    .await??;

    Ok((
        StatusCode::CREATED,
        Json(RegisterUserResponse {
            id,
            username: payload.username,
            email: payload.email,
            first_name: payload.first_name,
            last_name: payload.last_name,
        }),
    ))
}

/// Fetch a user profile
///
/// The optional `user_id` query parameter identifies the requesting user and
/// drives the `is_subscribed` flag.
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Query(params): Query<ViewerParams>,
) -> Result<Json<UserProfile>> {
    let db = state.db.clone();
    let viewer = params.user_id;

    let profile = tokio::task::spawn_blocking(move || -> Result<UserProfile> {
        let read_txn = db.begin_read()?;
        let users = read_txn.open_table(tables::USERS)?;

        let record: UserRecord = users
            .get(id)?
            .map(|b| db::decode(b.value()))
            .transpose()?
            .ok_or(AppError::UserNotFound)?;

        build_user_profile(&read_txn, id, &record, viewer)
    })
    .await??;

    Ok(Json(profile))
}
