use std::collections::BTreeMap;

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::ApiError;
use crate::context::AppContext;

#[derive(Debug, Serialize, Deserialize)]
pub struct PromptBody {
    pub name: String,
    pub template: String,
}

#[derive(Serialize)]
pub struct PromptUpdated {
    name: String,
    template: String,
    message: &'static str,
}

pub async fn list_prompts(State(state): State<AppContext>) -> Json<BTreeMap<String, String>> {
    Json(state.prompts.read().await.all().clone())
}

pub async fn get_prompt(
    State(state): State<AppContext>,
    Path(name): Path<String>,
) -> Result<Json<PromptBody>, ApiError> {
    let prompts = state.prompts.read().await;
    match prompts.get(&name) {
        Some(template) => Ok(Json(PromptBody {
            name,
            template: template.to_string(),
        })),
        None => Err(ApiError::not_found(format!(
            "Prompt '{}' not found. Available: {}",
            name,
            prompts.names().join(", ")
        ))),
    }
}

/// Creates or replaces a prompt and writes the library back to disk.
///
/// If the file cannot be written, the in-memory library is rolled back.
pub async fn update_prompt(
    State(state): State<AppContext>,
    Path(name): Path<String>,
    Json(body): Json<PromptBody>,
) -> Result<Json<PromptUpdated>, ApiError> {
    if body.name != name {
        return Err(ApiError::bad_request(format!(
            "Prompt name in body '{}' does not match URL '{}'",
            body.name, name
        )));
    }

    let mut prompts = state.prompts.write().await;
    let previous = prompts.set(name.clone(), body.template.clone());

    if let Err(e) = prompts.save() {
        match previous {
            Some(template) => {
                prompts.set(name.clone(), template);
            }
            None => {
                prompts.remove(&name);
            }
        }
        return Err(e.into());
    }

    tracing::info!("Updated prompt '{}'", name);
    Ok(Json(PromptUpdated {
        name,
        template: body.template,
        message: "Prompt updated successfully",
    }))
}
