use serde_json::{Map, Value};
use sqlx::SqlitePool;

use super::{decode_json, encode_json, RepoResult};
use crate::models::UserSettings;

#[derive(Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct SettingsRow {
    user_id: String,
    goals: String,
    api_keys: String,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, settings: &UserSettings) -> RepoResult<String> {
        sqlx::query("INSERT INTO user_settings (user_id, goals, api_keys) VALUES (?, ?, ?)")
            .bind(&settings.user_id)
            .bind(encode_json(&settings.goals, "goals")?)
            .bind(encode_json(&settings.api_keys, "api_keys")?)
            .execute(&self.pool)
            .await?;
        Ok(settings.user_id.clone())
    }

    pub async fn get(&self, user_id: &str) -> RepoResult<Option<UserSettings>> {
        let row: Option<SettingsRow> =
            sqlx::query_as("SELECT user_id, goals, api_keys FROM user_settings WHERE user_id = ?")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|row| -> RepoResult<_> {
            let goals: Vec<String> = decode_json(&row.goals, "goals", &row.user_id)?;
            let api_keys: Map<String, Value> =
                decode_json(&row.api_keys, "api_keys", &row.user_id)?;
            Ok(UserSettings {
                user_id: row.user_id,
                goals,
                api_keys,
            })
        })
        .transpose()
    }

    pub async fn update(&self, user_id: &str, settings: &UserSettings) -> RepoResult<bool> {
        let result =
            sqlx::query("UPDATE user_settings SET goals = ?, api_keys = ? WHERE user_id = ?")
                .bind(encode_json(&settings.goals, "goals")?)
                .bind(encode_json(&settings.api_keys, "api_keys")?)
                .bind(user_id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, user_id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM user_settings WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Creates the settings row or replaces an existing one.
    pub async fn save(&self, settings: &UserSettings) -> RepoResult<()> {
        if !self.update(&settings.user_id, settings).await? {
            self.create(settings).await?;
        }
        Ok(())
    }
}
