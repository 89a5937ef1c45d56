//! HTTP client for the Hevy public API.
//!
//! Every call issues exactly one request. Non-success statuses become
//! [`HevyError::Status`]; retrying is left to callers.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use super::error::HevyError;
use super::types::{RoutineFolderPayload, RoutinePayload, TemplatesPage, WorkoutsPage};

pub const DEFAULT_BASE_URL: &str = "https://api.hevyapp.com";
/// Environment variable consulted when no token is passed explicitly.
pub const TOKEN_ENV_VAR: &str = "HEVY_TOKEN";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Operations the sync and matching code need from Hevy.
#[async_trait]
pub trait HevyApi: Send + Sync {
    async fn list_workouts(&self, page: u32, page_size: u32) -> Result<WorkoutsPage, HevyError>;

    async fn list_exercise_templates(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<TemplatesPage, HevyError>;

    /// Creates a routine and returns the raw response body.
    async fn create_routine(&self, payload: &RoutinePayload) -> Result<Value, HevyError>;

    /// Creates a routine folder and returns the raw response body.
    async fn create_routine_folder(
        &self,
        payload: &RoutineFolderPayload,
    ) -> Result<Value, HevyError>;
}

pub struct HevyClient {
    client: Client,
    base_url: String,
    token: String,
}

impl HevyClient {
    /// Creates a client against the public API.
    ///
    /// Uses `token` if given, otherwise `HEVY_TOKEN`. Fails with
    /// [`HevyError::MissingToken`] when neither is set.
    pub fn new(token: Option<String>) -> Result<Self, HevyError> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        token: Option<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, HevyError> {
        let token = resolve_token(token, std::env::var(TOKEN_ENV_VAR).ok())?;

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| HevyError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_page<T: DeserializeOwned>(
        &self,
        path: &str,
        page: u32,
        page_size: u32,
    ) -> Result<T, HevyError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, page, page_size, "GET");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .header(header::CONTENT_TYPE, "application/json")
            .query(&[("page", page), ("pageSize", page_size)])
            .send()
            .await
            .map_err(|e| HevyError::Request {
                url: url.clone(),
                message: e.to_string(),
            })?;

        read_json(url, response).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, HevyError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| HevyError::Request {
                url: url.clone(),
                message: e.to_string(),
            })?;

        read_json(url, response).await
    }
}

#[async_trait]
impl HevyApi for HevyClient {
    async fn list_workouts(&self, page: u32, page_size: u32) -> Result<WorkoutsPage, HevyError> {
        self.get_page("/v1/workouts", page, page_size).await
    }

    async fn list_exercise_templates(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<TemplatesPage, HevyError> {
        self.get_page("/v1/exercise_templates", page, page_size).await
    }

    async fn create_routine(&self, payload: &RoutinePayload) -> Result<Value, HevyError> {
        self.post("/v1/routines", payload).await
    }

    async fn create_routine_folder(
        &self,
        payload: &RoutineFolderPayload,
    ) -> Result<Value, HevyError> {
        self.post("/v1/routine_folders", payload).await
    }
}

fn resolve_token(explicit: Option<String>, from_env: Option<String>) -> Result<String, HevyError> {
    explicit
        .filter(|t| !t.trim().is_empty())
        .or_else(|| from_env.filter(|t| !t.trim().is_empty()))
        .ok_or(HevyError::MissingToken)
}

async fn read_json<T: DeserializeOwned>(url: String, response: Response) -> Result<T, HevyError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(HevyError::Status {
            url,
            status: status.as_u16(),
            body,
        });
    }

    response.json::<T>().await.map_err(|e| HevyError::Decode {
        url,
        message: e.to_string(),
    })
}
