//! Request and response shapes for the Hevy API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::ExerciseTemplate;

/// One page of `GET /v1/workouts`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct WorkoutsPage {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub workouts: Vec<HevyWorkout>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HevyWorkout {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub exercises: Vec<HevyExercise>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HevyExercise {
    #[serde(default)]
    pub exercise_template: Option<HevyTemplateName>,
    #[serde(default)]
    pub sets: Vec<Value>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct HevyTemplateName {
    #[serde(default)]
    pub name: Option<String>,
}

/// One page of `GET /v1/exercise_templates`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TemplatesPage {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub exercise_templates: Vec<ExerciseTemplate>,
}

/// Body of `POST /v1/routines`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutinePayload {
    pub title: String,
    pub exercises: Vec<RoutineExercise>,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineExercise {
    pub name: String,
    pub sets: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `POST /v1/routine_folders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutineFolderPayload {
    pub title: String,
}

/// Extracts the `id` of a created resource, accepting string or numeric ids.
pub fn created_id(response: &Value) -> Option<String> {
    match response.get("id")? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
