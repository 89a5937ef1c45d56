//! HTTP API.
//!
//! # Endpoints
//!
//! - `GET /`, `GET /health`: liveness
//! - `GET|POST /workouts`, `GET|PUT|DELETE /workouts/{id}`: stored workouts
//! - `POST /workouts/generate`: LLM workout generation
//! - `POST /sync`, `GET /sync/status`: Hevy sync (503 without a token)
//! - `GET /prompts`, `GET|PUT /prompts/{name}`: prompt templates
//! - `GET|PUT /settings/{user_id}`: user settings
//!
//! Errors are JSON bodies of the form `{"error": ..., "message": ...}`.

mod error;
mod prompts;
mod settings;
mod sync;
mod workouts;

pub use error::ApiError;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::trace::TraceLayer;

use crate::context::AppContext;

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
struct RootResponse {
    message: &'static str,
}

async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "AI Personal Trainer API is running",
    })
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Builds the application router.
pub fn router(state: AppContext) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route(
            "/workouts",
            get(workouts::list_workouts).post(workouts::create_workout),
        )
        .route("/workouts/generate", post(workouts::generate_workout))
        .route(
            "/workouts/{id}",
            get(workouts::get_workout)
                .put(workouts::update_workout)
                .delete(workouts::delete_workout),
        )
        .route("/sync", post(sync::run_sync))
        .route("/sync/status", get(sync::sync_status))
        .route("/prompts", get(prompts::list_prompts))
        .route(
            "/prompts/{name}",
            get(prompts::get_prompt).put(prompts::update_prompt),
        )
        .route(
            "/settings/{user_id}",
            get(settings::get_settings).put(settings::put_settings),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::clock::SystemClock;
    use crate::context::AppContext;
    use crate::db::test_support::{setup_db, TestDb};
    use crate::generate::{CompletionClient, LlmError, PromptLibrary, SINGLE_WORKOUT};
    use crate::hevy::fake::FakeHevy;
    use crate::hevy::HevyApi;
    use crate::sync::SyncSettings;

    pub struct CannedLlm(pub &'static str);

    #[async_trait]
    impl CompletionClient for CannedLlm {
        async fn complete(&self, _api_key: &str, _prompt: &str) -> Result<String, LlmError> {
            Ok(self.0.to_string())
        }
    }

    pub struct TestApp {
        pub router: Router,
        pub context: AppContext,
        pub _db: TestDb,
    }

    /// Router over a temp database. `hevy` enables the sync endpoints.
    pub async fn test_app(prompts: PromptLibrary, hevy: Option<Arc<FakeHevy>>) -> TestApp {
        let db = setup_db().await;
        let context = AppContext::from_parts(
            db.pool.clone(),
            prompts,
            Arc::new(CannedLlm("1. Squat\n4 sets of 6 reps")),
            hevy.map(|fake| fake as Arc<dyn HevyApi>),
            Arc::new(SystemClock),
            SyncSettings::default(),
        );
        TestApp {
            router: super::router(context.clone()),
            context,
            _db: db,
        }
    }

    pub fn default_prompts() -> PromptLibrary {
        PromptLibrary::from_prompts([(SINGLE_WORKOUT, "A {duration} minute workout")])
    }

    pub async fn send(
        router: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }
}
