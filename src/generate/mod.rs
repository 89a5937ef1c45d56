//! LLM-backed workout generation.
//!
//! A request is turned into a prompt from the `single_workout` template,
//! sent to the completion client with the user's OpenRouter key, parsed back
//! into exercises and enriched with catalog matches and weight suggestions.

mod openrouter;
mod parser;
mod prompt;
mod weights;

pub use openrouter::{CompletionClient, LlmError, OpenRouterClient, DEFAULT_MODEL};
pub use parser::parse_workout_response;
pub use prompt::{build_workout_prompt, PromptError, PromptLibrary, SINGLE_WORKOUT};
pub use weights::suggest_weight;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

use crate::clock::Clock;
use crate::db::{RepoError, SettingsRepository};
use crate::matching::ExerciseMatcher;
use crate::models::{ExerciseEntry, MatchResult, Workout, OPENROUTER_PROVIDER};

pub const MIN_DURATION: u32 = 10;
pub const MAX_DURATION: u32 = 180;

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("OpenRouter API key not found in user settings")]
    MissingApiKey,

    #[error("Prompt template '{0}' not found")]
    MissingPrompt(String),

    #[error(transparent)]
    Repository(#[from] RepoError),

    #[error("Failed to generate workout: {0}")]
    Llm(#[from] LlmError),
}

impl GenerateError {
    /// Whether the caller, not the server, is at fault.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_) | Self::MissingApiKey)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkoutConstraints {
    pub goals: Vec<String>,
    pub equipment: Vec<String>,
    /// Minutes, between 10 and 180.
    pub duration: u32,
    pub fitness_level: String,
}

impl Default for WorkoutConstraints {
    fn default() -> Self {
        Self {
            goals: Vec::new(),
            equipment: Vec::new(),
            duration: 30,
            fitness_level: "beginner".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkoutOverrides {
    #[serde(default)]
    pub specific_exercises: Option<Vec<String>>,
    #[serde(default)]
    pub avoid_exercises: Option<Vec<String>>,
    #[serde(default)]
    pub focus_areas: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRequest {
    pub user_id: String,
    #[serde(default)]
    pub constraints: WorkoutConstraints,
    #[serde(default)]
    pub overrides: Option<WorkoutOverrides>,
}

impl WorkoutRequest {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            constraints: WorkoutConstraints::default(),
            overrides: None,
        }
    }

    pub fn validate(&self) -> Result<(), GenerateError> {
        if self.user_id.trim().is_empty() {
            return Err(GenerateError::InvalidRequest("user_id is required".into()));
        }
        let duration = self.constraints.duration;
        if !(MIN_DURATION..=MAX_DURATION).contains(&duration) {
            return Err(GenerateError::InvalidRequest(format!(
                "duration must be between {} and {} minutes, got {}",
                MIN_DURATION, MAX_DURATION, duration
            )));
        }
        Ok(())
    }
}

pub struct WorkoutGenerator {
    settings: SettingsRepository,
    prompts: Arc<RwLock<PromptLibrary>>,
    llm: Arc<dyn CompletionClient>,
    matcher: Option<ExerciseMatcher>,
    clock: Arc<dyn Clock>,
}

impl WorkoutGenerator {
    /// `matcher` is `None` when no Hevy token is configured; every exercise
    /// then resolves to the fallback template.
    pub fn new(
        settings: SettingsRepository,
        prompts: Arc<RwLock<PromptLibrary>>,
        llm: Arc<dyn CompletionClient>,
        matcher: Option<ExerciseMatcher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            settings,
            prompts,
            llm,
            matcher,
            clock,
        }
    }

    /// Generates a workout dated now. The result is not persisted.
    pub async fn generate(&self, request: &WorkoutRequest) -> Result<Workout, GenerateError> {
        request.validate()?;

        let template = self
            .prompts
            .read()
            .await
            .get(SINGLE_WORKOUT)
            .map(str::to_string)
            .ok_or_else(|| GenerateError::MissingPrompt(SINGLE_WORKOUT.to_string()))?;

        let settings = self.settings.get(&request.user_id).await?;
        let api_key = settings
            .as_ref()
            .and_then(|s| s.api_key(OPENROUTER_PROVIDER))
            .ok_or(GenerateError::MissingApiKey)?;

        let prompt = build_workout_prompt(
            &template,
            &request.constraints,
            request.overrides.as_ref(),
        );
        tracing::debug!(user_id = %request.user_id, "sending workout prompt");
        let reply = self.llm.complete(api_key, &prompt).await?;

        let mut exercises = parse_workout_response(&reply);
        for exercise in &mut exercises {
            self.enrich(exercise, &request.constraints.fitness_level).await;
        }
        tracing::info!("Generated workout with {} exercises", exercises.len());

        Ok(Workout::new(self.clock.now()).with_exercises(exercises))
    }

    async fn enrich(&self, exercise: &mut ExerciseEntry, fitness_level: &str) {
        let name = exercise.name.clone().unwrap_or_default();

        let matched = match &self.matcher {
            Some(matcher) => matcher.match_default(&name).await,
            None => MatchResult::fallback(&name),
        };
        exercise.template_id = Some(matched.template_id);
        exercise.matched_name = Some(matched.name);
        exercise.suggested_weight = suggest_weight(&name, fitness_level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::db::test_support::{setup_db, TestDb};
    use crate::hevy::fake::FakeHevy;
    use crate::matching::TemplateCache;
    use crate::models::{ExerciseTemplate, Sets, SuggestedWeight, UserSettings};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::sync::Mutex;

    struct FakeLlm {
        reply: String,
        calls: Mutex<Vec<(String, String)>>,
    }

    impl FakeLlm {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: reply.to_string(),
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl CompletionClient for FakeLlm {
        async fn complete(&self, api_key: &str, prompt: &str) -> Result<String, LlmError> {
            self.calls
                .lock()
                .unwrap()
                .push((api_key.to_string(), prompt.to_string()));
            Ok(self.reply.clone())
        }
    }

    const REPLY: &str = "1. Squat\n3 sets of 5 reps\n2. Jumping Jacks\nKeep a steady pace";

    fn prompts() -> Arc<RwLock<PromptLibrary>> {
        Arc::new(RwLock::new(PromptLibrary::from_prompts([(
            SINGLE_WORKOUT,
            "{fitness_level} workout for {goals} in {duration} minutes",
        )])))
    }

    fn generator(
        db: &TestDb,
        llm: Arc<FakeLlm>,
        prompts: Arc<RwLock<PromptLibrary>>,
        matcher: Option<ExerciseMatcher>,
    ) -> WorkoutGenerator {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2025, 5, 1, 7, 0, 0).unwrap(),
        ));
        WorkoutGenerator::new(
            SettingsRepository::new(db.pool.clone()),
            prompts,
            llm,
            matcher,
            clock,
        )
    }

    async fn save_key(db: &TestDb) {
        SettingsRepository::new(db.pool.clone())
            .save(
                &UserSettings::new("u1")
                    .with_goals(vec!["strength".into()])
                    .with_api_key(OPENROUTER_PROVIDER, "sk-1"),
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_generates_matched_and_weighted_workout() {
        let db = setup_db().await;
        save_key(&db).await;
        let fake = Arc::new(FakeHevy::with_templates(vec![
            ExerciseTemplate::new("t1", "Squat"),
            ExerciseTemplate::new("t2", "Bench Press"),
        ]));
        let matcher = ExerciseMatcher::new(Arc::new(TemplateCache::new(
            fake,
            Arc::new(ManualClock::new(Utc::now())),
        )));
        let llm = FakeLlm::replying(REPLY);
        let gen = generator(&db, llm.clone(), prompts(), Some(matcher));

        let mut request = WorkoutRequest::new("u1");
        request.constraints.goals = vec!["strength".into()];
        request.constraints.fitness_level = "intermediate".into();
        let workout = gen.generate(&request).await.unwrap();

        assert!(workout.id.is_none());
        assert_eq!(workout.date, Utc.with_ymd_and_hms(2025, 5, 1, 7, 0, 0).unwrap());

        let squat = &workout.exercises[0];
        assert_eq!(squat.template_id.as_deref(), Some("t1"));
        assert_eq!(squat.matched_name.as_deref(), Some("Squat"));
        assert_eq!(squat.suggested_weight, Some(SuggestedWeight::kg(40.0)));
        assert_eq!(squat.sets, Some(Sets::Count(3)));
        assert_eq!(squat.reps, Some(json!("5")));

        let jacks = &workout.exercises[1];
        assert_eq!(jacks.template_id.as_deref(), Some("other_notes"));
        assert_eq!(
            jacks.matched_name.as_deref(),
            Some("Other – Notes - Jumping Jacks")
        );
        assert!(jacks.suggested_weight.is_none());
        assert_eq!(jacks.notes.as_deref(), Some("Keep a steady pace"));

        let calls = llm.calls.lock().unwrap();
        assert_eq!(
            calls[0],
            (
                "sk-1".to_string(),
                "intermediate workout for strength in 30 minutes".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_without_matcher_every_exercise_falls_back() {
        let db = setup_db().await;
        save_key(&db).await;
        let gen = generator(&db, FakeLlm::replying(REPLY), prompts(), None);

        let workout = gen.generate(&WorkoutRequest::new("u1")).await.unwrap();
        assert!(workout
            .exercises
            .iter()
            .all(|e| e.template_id.as_deref() == Some("other_notes")));
        // beginner default
        assert_eq!(
            workout.exercises[0].suggested_weight,
            Some(SuggestedWeight::kg(20.0))
        );
    }

    #[tokio::test]
    async fn test_missing_settings_or_key() {
        let db = setup_db().await;
        let llm = FakeLlm::replying(REPLY);
        let gen = generator(&db, llm.clone(), prompts(), None);

        let err = gen.generate(&WorkoutRequest::new("nobody")).await.unwrap_err();
        assert!(matches!(err, GenerateError::MissingApiKey));
        assert!(err.is_client_error());

        SettingsRepository::new(db.pool.clone())
            .save(&UserSettings::new("keyless").with_api_key("other", "x"))
            .await
            .unwrap();
        let err = gen.generate(&WorkoutRequest::new("keyless")).await.unwrap_err();
        assert!(matches!(err, GenerateError::MissingApiKey));
        assert!(llm.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_template() {
        let db = setup_db().await;
        save_key(&db).await;
        let empty = Arc::new(RwLock::new(PromptLibrary::default()));
        let gen = generator(&db, FakeLlm::replying(REPLY), empty, None);

        let err = gen.generate(&WorkoutRequest::new("u1")).await.unwrap_err();
        assert!(matches!(err, GenerateError::MissingPrompt(_)));
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_request_validation() {
        let mut request = WorkoutRequest::new("u1");
        assert!(request.validate().is_ok());

        for duration in [9, 181] {
            request.constraints.duration = duration;
            assert!(matches!(
                request.validate(),
                Err(GenerateError::InvalidRequest(_))
            ));
        }
        request.constraints.duration = 180;
        assert!(request.validate().is_ok());

        assert!(WorkoutRequest::new(" ").validate().is_err());
    }

    #[test]
    fn test_request_defaults_from_json() {
        let request: WorkoutRequest =
            serde_json::from_value(json!({"user_id": "u1", "constraints": {"goals": ["fat loss"]}}))
                .unwrap();
        assert_eq!(request.constraints.duration, 30);
        assert_eq!(request.constraints.fitness_level, "beginner");
        assert!(request.overrides.is_none());
    }
}
