use std::sync::Arc;

use axum::{extract::State, Json};

use super::ApiError;
use crate::context::AppContext;
use crate::sync::{SyncRun, SyncService, SyncStatus};

fn sync_service(state: &AppContext) -> Result<Arc<SyncService>, ApiError> {
    state.sync.clone().ok_or_else(ApiError::sync_disabled)
}

/// Runs one sync cycle and reports its outcome.
pub async fn run_sync(State(state): State<AppContext>) -> Result<Json<SyncRun>, ApiError> {
    let service = sync_service(&state)?;
    Ok(Json(service.run_sync().await))
}

pub async fn sync_status(State(state): State<AppContext>) -> Result<Json<SyncStatus>, ApiError> {
    let service = sync_service(&state)?;
    Ok(Json(service.status()))
}
