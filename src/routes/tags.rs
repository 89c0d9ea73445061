use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use crate::db::{self, tables};
use crate::error::{AppError, Result};
use crate::models::TagRecord;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
    pub color: Option<String>,
    pub slug: String,
}

#[derive(Debug, Serialize)]
pub struct TagResponse {
    pub id: u64,
    pub name: String,
    pub color: Option<String>,
    pub slug: String,
}

/// Create a tag
///
/// Slugs are unique across all tags and drive recipe filtering.
pub async fn create_tag(
    State(state): State<AppState>,
    Json(payload): Json<CreateTagRequest>,
) -> Result<(StatusCode, Json<TagResponse>)> {
    if !TagRecord::validate_name(&payload.name) {
        return Err(AppError::InvalidInput(
            "Tag name must be non-empty".to_string(),
        ));
    }

    if !TagRecord::validate_slug(&payload.slug) {
        return Err(AppError::InvalidInput(
            "Slug must be non-empty lowercase letters, digits, '-' or '_'".to_string(),
        ));
    }

    if let Some(color) = &payload.color {
        if !TagRecord::validate_color(color) {
            return Err(AppError::InvalidInput(
                "Color must be in #RRGGBB format".to_string(),
            ));
        }
    }

    let db = state.db.clone();
    let record = TagRecord {
        name: payload.name.clone(),
        color: payload.color.clone(),
        slug: payload.slug.clone(),
    };

    let id = tokio::task::spawn_blocking(move || -> Result<u64> {
        let write_txn = db.begin_write()?;
        let id;
        {
            let mut tags = write_txn.open_table(tables::TAGS)?;

            // Slug uniqueness: tags are a small reference set, a scan is enough
            for entry in tags.iter()? {
                let (_, value) = entry?;
                let existing: TagRecord = db::decode(value.value())?;
                if existing.slug == record.slug {
                    tracing::info!("Tag slug already in use: {}", record.slug);
                    return Err(AppError::TagSlugTaken);
                }
            }

            id = db::next_id(&write_txn, "tags")?;
            let bytes = db::encode(&record)?;
            tags.insert(id, bytes.as_slice())?;
        }
        write_txn.commit()?;

        tracing::info!("Tag created: {} (id {})", record.slug, id);
        Ok(id)
    })
    .await??;

    Ok((
        StatusCode::CREATED,
        Json(TagResponse {
            id,
            name: payload.name,
            color: payload.color,
            slug: payload.slug,
        }),
    ))
}

/// List all tags
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<TagResponse>>> {
    let db = state.db.clone();

    let results = tokio::task::spawn_blocking(move || -> Result<Vec<TagResponse>> {
        let read_txn = db.begin_read()?;
        let tags = read_txn.open_table(tables::TAGS)?;

        let mut results = Vec::new();
        for entry in tags.iter()? {
            let (key, value) = entry?;
            let record: TagRecord = db::decode(value.value())?;
            results.push(TagResponse {
                id: key.value(),
                name: record.name,
                color: record.color,
                slug: record.slug,
            });
        }

        Ok(results)
    })
    .await??;

    Ok(Json(results))
}

/// Fetch a single tag
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<TagResponse>> {
    let db = state.db.clone();

    let record = tokio::task::spawn_blocking(move || -> Result<TagRecord> {
        let read_txn = db.begin_read()?;
        let tags = read_txn.open_table(tables::TAGS)?;

        tags.get(id)?
            .map(|b| db::decode(b.value()))
            .transpose()?
            .ok_or(AppError::TagNotFound)
    })
    .await??;

    Ok(Json(TagResponse {
        id,
        name: record.name,
        color: record.color,
        slug: record.slug,
    }))
}
