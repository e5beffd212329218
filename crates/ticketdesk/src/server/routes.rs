//! Route handlers for the record API.

use axum::{extract::State, Json};
use tracing::{error, info};

use crate::record::{validate_all, Device, Record};

use super::error::ApiError;
use super::state::AppState;

/// Body returned after a successful upload.
pub const SAVED_MESSAGE: &str = "Data saved successfully";

/// `GET /api/users`
pub async fn list_records_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Record>>, ApiError> {
    let records = state
        .with_store(|store| store.list_records())
        .await
        .map_err(|e| {
            error!("Failed to read records: {e}");
            ApiError::ReadRecords
        })?;

    Ok(Json(records))
}

/// `GET /api/devices`
pub async fn list_devices_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Device>>, ApiError> {
    let devices = state
        .with_store(|store| store.list_devices())
        .await
        .map_err(|e| {
            error!("Failed to read devices: {e}");
            ApiError::ReadDevices
        })?;

    Ok(Json(devices))
}

/// `POST /api/users`: replace the whole collection.
pub async fn replace_records_handler(
    State(state): State<AppState>,
    Json(records): Json<Vec<Record>>,
) -> Result<&'static str, ApiError> {
    if state.require_fields() {
        validate_all(&records).map_err(ApiError::Invalid)?;
    }

    let count = records.len();
    state
        .with_store(move |store| store.replace_records(&records))
        .await
        .map_err(|e| {
            error!("Failed to save records: {e}");
            ApiError::SaveRecords
        })?;

    info!("Saved {count} records");
    Ok(SAVED_MESSAGE)
}
