mod plan;
mod settings;
mod template;
mod workout;

pub use plan::WorkoutPlan;
pub use settings::{ExerciseTemplateRef, Goal, SyncToken, UserSettings, OPENROUTER_PROVIDER};
pub use template::{ExerciseTemplate, MatchResult, FALLBACK_TEMPLATE_ID, FALLBACK_TEMPLATE_NAME};
pub use workout::{ExerciseEntry, Sets, SuggestedWeight, Workout};
