use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Provider key under which the OpenRouter API key is stored.
pub const OPENROUTER_PROVIDER: &str = "openrouter";

/// Per-user preferences and third-party credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: String,
    #[serde(default)]
    pub goals: Vec<String>,
    /// Credentials keyed by provider name (e.g. "openrouter").
    #[serde(default)]
    pub api_keys: Map<String, Value>,
}

impl UserSettings {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            goals: Vec::new(),
            api_keys: Map::new(),
        }
    }

    pub fn with_goals(mut self, goals: Vec<String>) -> Self {
        self.goals = goals;
        self
    }

    pub fn with_api_key(mut self, provider: impl Into<String>, key: impl Into<String>) -> Self {
        self.api_keys
            .insert(provider.into(), Value::String(key.into()));
        self
    }

    /// Returns the credential for a provider if it is stored as a string.
    pub fn api_key(&self, provider: &str) -> Option<&str> {
        self.api_keys.get(provider).and_then(Value::as_str)
    }
}

/// A fitness goal linked to a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub name: String,
    pub description: String,
    pub template_id: String,
}

/// Locally stored reference to a Hevy exercise template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseTemplateRef {
    pub template_id: String,
    pub name: String,
}

/// Stored access token for the Hevy integration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncToken {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl SyncToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
