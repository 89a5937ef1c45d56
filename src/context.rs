//! Wiring shared by the CLI and the HTTP server.

use std::sync::Arc;

use sqlx::SqlitePool;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::db::{init_db, RepoError, SettingsRepository, WorkoutRepository};
use crate::generate::{
    CompletionClient, LlmError, OpenRouterClient, PromptError, PromptLibrary, WorkoutGenerator,
};
use crate::hevy::{HevyApi, HevyClient, HevyError};
use crate::matching::{ExerciseMatcher, TemplateCache};
use crate::sync::{SyncService, SyncSettings};

#[derive(Error, Debug)]
pub enum ContextError {
    #[error(transparent)]
    Database(#[from] RepoError),

    #[error(transparent)]
    Prompts(#[from] PromptError),

    #[error(transparent)]
    Hevy(#[from] HevyError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Repositories and services built from one [`Config`].
///
/// Hevy-backed parts (`matcher`, `sync`) are `None` when no token is
/// configured.
#[derive(Clone)]
pub struct AppContext {
    pub workouts: WorkoutRepository,
    pub settings: SettingsRepository,
    pub prompts: Arc<RwLock<PromptLibrary>>,
    pub generator: Arc<WorkoutGenerator>,
    pub matcher: Option<ExerciseMatcher>,
    pub sync: Option<Arc<SyncService>>,
}

impl AppContext {
    /// Opens the database, loads the prompt library and builds the remote
    /// clients.
    pub async fn from_config(config: &Config) -> Result<Self, ContextError> {
        let pool = init_db(&config.database_path.value).await?;
        let prompts = PromptLibrary::load(&config.prompts_path.value)?;
        let llm = Arc::new(OpenRouterClient::new(
            config.openrouter_model.value.clone(),
        )?);

        let hevy: Option<Arc<dyn HevyApi>> = match config.hevy_token() {
            Some(token) => Some(Arc::new(HevyClient::with_base_url(
                Some(token.to_string()),
                config.hevy_base_url.value.clone(),
            )?)),
            None => {
                tracing::warn!("No Hevy token configured, sync and exercise matching disabled");
                None
            }
        };

        Ok(Self::from_parts(
            pool,
            prompts,
            llm,
            hevy,
            Arc::new(SystemClock),
            config.sync_settings(),
        ))
    }

    /// Assembles the context from already-built parts.
    pub fn from_parts(
        pool: SqlitePool,
        prompts: PromptLibrary,
        llm: Arc<dyn CompletionClient>,
        hevy: Option<Arc<dyn HevyApi>>,
        clock: Arc<dyn Clock>,
        sync_settings: SyncSettings,
    ) -> Self {
        let workouts = WorkoutRepository::with_clock(pool.clone(), Arc::clone(&clock));
        let settings = SettingsRepository::new(pool);
        let prompts = Arc::new(RwLock::new(prompts));

        let matcher = hevy.as_ref().map(|api| {
            ExerciseMatcher::new(Arc::new(TemplateCache::new(
                Arc::clone(api),
                Arc::clone(&clock),
            )))
        });
        let sync = hevy.map(|api| {
            Arc::new(SyncService::new(
                api,
                workouts.clone(),
                Arc::clone(&clock),
                sync_settings,
            ))
        });

        let generator = Arc::new(WorkoutGenerator::new(
            settings.clone(),
            Arc::clone(&prompts),
            llm,
            matcher.clone(),
            clock,
        ));

        Self {
            workouts,
            settings,
            prompts,
            generator,
            matcher,
            sync,
        }
    }
}
