use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Serialize;
use uuid::Uuid;

use super::ApiResponse;
use crate::db::prefs_repo;
use crate::errors::AppError;
use crate::models::User;
use crate::stores::filters::FiltersState;
use crate::stores::tour::TourState;
use crate::stores::VersionedStore;
use crate::AppState;

/// Snapshot as sent to the client: schema version plus payload.
#[derive(Serialize)]
pub struct StoreEnvelope {
    pub version: i32,
    pub data: serde_json::Value,
}

async fn load_envelope<T: VersionedStore>(
    pool: &sqlx::PgPool,
    user_id: Uuid,
) -> Result<StoreEnvelope, AppError> {
    let snapshot = prefs_repo::get_snapshot(pool, user_id, T::NAME).await?;
    let state = T::load(snapshot)
        .map_err(|e| AppError::BadRequest(format!("unreadable {} snapshot: {e}", T::NAME)))?;
    let data = serde_json::to_value(state).map_err(anyhow::Error::from)?;

    Ok(StoreEnvelope {
        version: T::VERSION,
        data,
    })
}

async fn save_envelope<T: VersionedStore>(
    pool: &sqlx::PgPool,
    user_id: Uuid,
    data: serde_json::Value,
) -> Result<StoreEnvelope, AppError> {
    // Round-trip through the store type so only well-formed snapshots
    // are persisted, always under the current version.
    let state: T = serde_json::from_value(data)
        .map_err(|e| AppError::BadRequest(format!("invalid {} state: {e}", T::NAME)))?;
    let data = serde_json::to_value(state).map_err(anyhow::Error::from)?;

    prefs_repo::put_snapshot(pool, user_id, T::NAME, T::VERSION, &data).await?;

    Ok(StoreEnvelope {
        version: T::VERSION,
        data,
    })
}

/// GET /api/prefs/{store} — load a snapshot, migrating old versions
pub async fn get_store(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(store): Path<String>,
) -> Result<Json<ApiResponse<StoreEnvelope>>, AppError> {
    let envelope = match store.as_str() {
        "tour" => load_envelope::<TourState>(&state.db, user.id).await?,
        "filters" => load_envelope::<FiltersState>(&state.db, user.id).await?,
        other => return Err(AppError::NotFound(format!("unknown store: {other}"))),
    };

    Ok(Json(ApiResponse::ok(envelope)))
}

/// PUT /api/prefs/{store} — replace a snapshot
pub async fn put_store(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Path(store): Path<String>,
    Json(data): Json<serde_json::Value>,
) -> Result<Json<ApiResponse<StoreEnvelope>>, AppError> {
    let envelope = match store.as_str() {
        "tour" => save_envelope::<TourState>(&state.db, user.id, data).await?,
        "filters" => save_envelope::<FiltersState>(&state.db, user.id, data).await?,
        other => return Err(AppError::NotFound(format!("unknown store: {other}"))),
    };

    Ok(Json(ApiResponse::ok(envelope)))
}
