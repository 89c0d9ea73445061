use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};

use crate::db::{self, tables};
use crate::error::{AppError, Result};
use crate::models::IngredientRecord;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateIngredientRequest {
    pub name: String,
    #[serde(default)]
    pub measurement_unit: String,
}

#[derive(Debug, Serialize)]
pub struct IngredientResponse {
    pub id: u64,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Deserialize)]
pub struct IngredientSearchParams {
    /// Case-insensitive name prefix filter
    pub name: Option<String>,
}

/// Add an ingredient to the catalog
///
/// Catalog entries are immutable reference data; there is no update or delete.
pub async fn create_ingredient(
    State(state): State<AppState>,
    Json(payload): Json<CreateIngredientRequest>,
) -> Result<(StatusCode, Json<IngredientResponse>)> {
    if !IngredientRecord::validate_name(&payload.name) {
        return Err(AppError::InvalidInput(
            "Ingredient name must be non-empty".to_string(),
        ));
    }

    if !IngredientRecord::validate_unit(&payload.measurement_unit) {
        return Err(AppError::InvalidInput(
            "Measurement unit is too long".to_string(),
        ));
    }

    let db = state.db.clone();
    let record = IngredientRecord {
        name: payload.name.clone(),
        measurement_unit: payload.measurement_unit.clone(),
    };

    let id = tokio::task::spawn_blocking(move || -> Result<u64> {
        let write_txn = db.begin_write()?;
        let id;
        {
            id = db::next_id(&write_txn, "ingredients")?;
            let mut ingredients = write_txn.open_table(tables::INGREDIENTS)?;
            let bytes = db::encode(&record)?;
            ingredients.insert(id, bytes.as_slice())?;
        }
        write_txn.commit()?;

        tracing::info!("Ingredient created: {} (id {})", record.name, id);
        Ok(id)
    })
    .await??;

    Ok((
        StatusCode::CREATED,
        Json(IngredientResponse {
            id,
            name: payload.name,
            measurement_unit: payload.measurement_unit,
        }),
    ))
}

/// List catalog ingredients, optionally filtered by name prefix
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(params): Query<IngredientSearchParams>,
) -> Result<Json<Vec<IngredientResponse>>> {
    let db = state.db.clone();
    let prefix = params.name.map(|p| p.to_lowercase());

    let results = tokio::task::spawn_blocking(move || -> Result<Vec<IngredientResponse>> {
        let read_txn = db.begin_read()?;
        let ingredients = read_txn.open_table(tables::INGREDIENTS)?;

        let mut results = Vec::new();
        for entry in ingredients.iter()? {
            let (key, value) = entry?;
            let record: IngredientRecord = db::decode(value.value())?;

            if let Some(prefix) = &prefix {
                if !record.name.to_lowercase().starts_with(prefix.as_str()) {
                    continue;
                }
            }

            results.push(IngredientResponse {
                id: key.value(),
                name: record.name,
                measurement_unit: record.measurement_unit,
            });
        }

        Ok(results)
    })
    .await??;

    Ok(Json(results))
}

/// Fetch a single catalog ingredient
pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<IngredientResponse>> {
    let db = state.db.clone();

    let record = tokio::task::spawn_blocking(move || -> Result<IngredientRecord> {
        let read_txn = db.begin_read()?;
        let ingredients = read_txn.open_table(tables::INGREDIENTS)?;

        ingredients
            .get(id)?
            .map(|b| db::decode(b.value()))
            .transpose()?
            .ok_or(AppError::IngredientNotFound)
    })
    .await??;

    Ok(Json(IngredientResponse {
        id,
        name: record.name,
        measurement_unit: record.measurement_unit,
    }))
}
