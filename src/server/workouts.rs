use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::ApiError;
use crate::context::AppContext;
use crate::generate::WorkoutRequest;
use crate::models::Workout;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    /// Only workouts created or updated within this many days.
    days: Option<i64>,
}

pub async fn list_workouts(
    State(state): State<AppContext>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Workout>>, ApiError> {
    let workouts = match params.days {
        Some(days) if days < 0 => {
            return Err(ApiError::bad_request("days must not be negative"));
        }
        Some(days) => state.workouts.list_recent(days).await?,
        None => state.workouts.list().await?,
    };
    Ok(Json(workouts))
}

pub async fn create_workout(
    State(state): State<AppContext>,
    Json(mut workout): Json<Workout>,
) -> Result<(StatusCode, Json<Workout>), ApiError> {
    let id = state.workouts.create(&workout).await?;
    tracing::info!("Created workout {}", id);
    workout.id = Some(id);
    Ok((StatusCode::CREATED, Json(workout)))
}

pub async fn get_workout(
    State(state): State<AppContext>,
    Path(id): Path<String>,
) -> Result<Json<Workout>, ApiError> {
    state
        .workouts
        .get(&id)
        .await?
        .map(Json)
        .ok_or_else(|| workout_not_found(&id))
}

pub async fn update_workout(
    State(state): State<AppContext>,
    Path(id): Path<String>,
    Json(mut workout): Json<Workout>,
) -> Result<Json<Workout>, ApiError> {
    if !state.workouts.update(&id, &workout).await? {
        return Err(workout_not_found(&id));
    }
    workout.id = Some(id);
    Ok(Json(workout))
}

pub async fn delete_workout(
    State(state): State<AppContext>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.workouts.delete(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(workout_not_found(&id))
    }
}

/// Generates a workout without storing it.
pub async fn generate_workout(
    State(state): State<AppContext>,
    Json(request): Json<WorkoutRequest>,
) -> Result<Json<Workout>, ApiError> {
    let workout = state.generator.generate(&request).await?;
    Ok(Json(workout))
}

fn workout_not_found(id: &str) -> ApiError {
    ApiError::not_found(format!("Workout with ID {} not found", id))
}
