//! OpenRouter chat-completions client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai";
pub const DEFAULT_MODEL: &str = "openai/gpt-3.5-turbo";
const COMPLETIONS_PATH: &str = "/api/v1/chat/completions";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const MAX_RETRIES: u32 = 3;
const BASE_DELAY: Duration = Duration::from_secs(1);

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Request to OpenRouter failed: {0}")]
    Request(String),

    #[error("OpenRouter returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected OpenRouter response: {0}")]
    Decode(String),
}

/// Sends a single prompt to a language model and returns its reply.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, api_key: &str, prompt: &str) -> Result<String, LlmError>;
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ReplyMessage,
}

#[derive(Deserialize)]
struct ReplyMessage {
    content: String,
}

enum Attempt {
    Done(String),
    Retry(LlmError),
}

pub struct OpenRouterClient {
    client: Client,
    base_url: String,
    model: String,
    max_retries: u32,
    base_delay: Duration,
}

impl OpenRouterClient {
    pub fn new(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_base_url(model, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| LlmError::ClientBuild(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
            max_retries: MAX_RETRIES,
            base_delay: BASE_DELAY,
        })
    }

    /// Overrides the first backoff delay; later retries double it.
    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.base_delay = delay;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn attempt(&self, api_key: &str, prompt: &str) -> Result<Attempt, LlmError> {
        let url = format!("{}{}", self.base_url, COMPLETIONS_PATH);
        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = match self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => return Ok(Attempt::Retry(LlmError::Request(e.to_string()))),
        };

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            let body = response.text().await.unwrap_or_default();
            return Ok(Attempt::Retry(LlmError::Status {
                status: status.as_u16(),
                body,
            }));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| Attempt::Done(choice.message.content))
            .ok_or_else(|| LlmError::Decode("response has no choices".to_string()))
    }
}

#[async_trait]
impl CompletionClient for OpenRouterClient {
    /// Retries rate limiting and transport failures with exponential
    /// backoff. Any other failure is returned immediately.
    async fn complete(&self, api_key: &str, prompt: &str) -> Result<String, LlmError> {
        let mut attempt = 0;
        loop {
            match self.attempt(api_key, prompt).await? {
                Attempt::Done(content) => return Ok(content),
                Attempt::Retry(err) if attempt >= self.max_retries => return Err(err),
                Attempt::Retry(err) => {
                    let delay = self.base_delay * 2u32.pow(attempt);
                    tracing::warn!(
                        "OpenRouter attempt {} failed ({}), retrying in {:?}",
                        attempt + 1,
                        err,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::HeaderMap, routing::post, Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    async fn spawn_server(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client_for(base: &str) -> OpenRouterClient {
        OpenRouterClient::with_base_url(DEFAULT_MODEL, base)
            .unwrap()
            .with_retry_delay(Duration::from_millis(1))
    }

    /// Fails with `status` for the first `failures` calls, then answers.
    fn flaky_app(failures: usize, status: u16) -> (Router, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let app = Router::new()
            .route(
                COMPLETIONS_PATH,
                post(
                    move |State(calls): State<Arc<AtomicUsize>>, Json(_body): Json<Value>| async move {
                        let n = calls.fetch_add(1, Ordering::SeqCst);
                        if n < failures {
                            let code = axum::http::StatusCode::from_u16(status).unwrap();
                            return (code, Json(json!({"error": "nope"})));
                        }
                        (
                            axum::http::StatusCode::OK,
                            Json(json!({"choices": [{"message": {"content": "1. Squat"}}]})),
                        )
                    },
                ),
            )
            .with_state(calls.clone());
        (app, calls)
    }

    #[tokio::test]
    async fn test_sends_model_prompt_and_key() {
        let app = Router::new().route(
            COMPLETIONS_PATH,
            post(|headers: HeaderMap, Json(body): Json<Value>| async move {
                let auth = headers
                    .get("authorization")
                    .and_then(|h| h.to_str().ok())
                    .unwrap_or_default()
                    .to_string();
                let model = body["model"].as_str().unwrap_or_default();
                let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
                let content = format!("{}|{}|{}", auth, model, prompt);
                Json(json!({"choices": [{"message": {"role": "assistant", "content": content}}]}))
            }),
        );
        let base = spawn_server(app).await;

        let reply = client_for(&base).complete("sk-test", "Plan a workout").await.unwrap();
        assert_eq!(reply, "Bearer sk-test|openai/gpt-3.5-turbo|Plan a workout");
    }

    #[tokio::test]
    async fn test_retries_rate_limit_then_succeeds() {
        let (app, calls) = flaky_app(2, 429);
        let base = spawn_server(app).await;

        let reply = client_for(&base).complete("k", "p").await.unwrap();
        assert_eq!(reply, "1. Squat");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let (app, calls) = flaky_app(10, 429);
        let base = spawn_server(app).await;

        let err = client_for(&base).complete("k", "p").await.unwrap_err();
        assert!(matches!(err, LlmError::Status { status: 429, .. }));
        // first attempt plus three retries
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn test_other_statuses_are_not_retried() {
        let (app, calls) = flaky_app(10, 401);
        let base = spawn_server(app).await;

        let err = client_for(&base).complete("k", "p").await.unwrap_err();
        assert!(matches!(err, LlmError::Status { status: 401, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_choices_is_decode_error() {
        let app = Router::new().route(
            COMPLETIONS_PATH,
            post(|| async { Json(json!({"choices": []})) }),
        );
        let base = spawn_server(app).await;

        let err = client_for(&base).complete("k", "p").await.unwrap_err();
        assert!(matches!(err, LlmError::Decode(_)));
    }
}
