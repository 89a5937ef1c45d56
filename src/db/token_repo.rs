use sqlx::SqlitePool;
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, RepoResult};
use crate::models::SyncToken;

#[derive(Clone)]
pub struct SyncTokenRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct TokenRow {
    id: String,
    access_token: String,
    expires_at: String,
}

impl SyncTokenRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, token: &SyncToken) -> RepoResult<String> {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO sync_tokens (id, access_token, expires_at) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(&token.access_token)
            .bind(format_timestamp(&token.expires_at))
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    pub async fn get(&self, id: &str) -> RepoResult<Option<SyncToken>> {
        let row: Option<TokenRow> =
            sqlx::query_as("SELECT id, access_token, expires_at FROM sync_tokens WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|r| -> RepoResult<_> {
            Ok(SyncToken {
                expires_at: parse_timestamp(&r.expires_at, "expires_at", &r.id)?,
                access_token: r.access_token,
            })
        })
        .transpose()
    }

    pub async fn update(&self, id: &str, token: &SyncToken) -> RepoResult<bool> {
        let result =
            sqlx::query("UPDATE sync_tokens SET access_token = ?, expires_at = ? WHERE id = ?")
                .bind(&token.access_token)
                .bind(format_timestamp(&token.expires_at))
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM sync_tokens WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
