use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ApiError;
use crate::context::AppContext;
use crate::models::UserSettings;

#[derive(Debug, Deserialize)]
pub struct SettingsBody {
    #[serde(default)]
    goals: Vec<String>,
    #[serde(default)]
    api_keys: Map<String, Value>,
}

/// Settings as returned to clients; key values are masked.
#[derive(Serialize)]
pub struct SettingsView {
    user_id: String,
    goals: Vec<String>,
    api_keys: Map<String, Value>,
}

impl From<UserSettings> for SettingsView {
    fn from(settings: UserSettings) -> Self {
        let api_keys = settings
            .api_keys
            .into_iter()
            .map(|(provider, _)| (provider, Value::String("********".to_string())))
            .collect();
        Self {
            user_id: settings.user_id,
            goals: settings.goals,
            api_keys,
        }
    }
}

pub async fn get_settings(
    State(state): State<AppContext>,
    Path(user_id): Path<String>,
) -> Result<Json<SettingsView>, ApiError> {
    state
        .settings
        .get(&user_id)
        .await?
        .map(|s| Json(s.into()))
        .ok_or_else(|| {
            ApiError::not_found(format!("User settings not found for user: {}", user_id))
        })
}

/// Replaces a user's settings, creating them if needed.
pub async fn put_settings(
    State(state): State<AppContext>,
    Path(user_id): Path<String>,
    Json(body): Json<SettingsBody>,
) -> Result<Json<SettingsView>, ApiError> {
    let settings = UserSettings {
        user_id,
        goals: body.goals,
        api_keys: body.api_keys,
    };
    state.settings.save(&settings).await?;
    Ok(Json(settings.into()))
}
