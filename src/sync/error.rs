use thiserror::Error;

use crate::db::RepoError;
use crate::hevy::HevyError;

/// Errors raised while reconciling workouts with Hevy.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error(transparent)]
    Remote(#[from] HevyError),

    #[error(transparent)]
    Repository(#[from] RepoError),

    #[error("Workout with ID {0} not found")]
    WorkoutNotFound(String),

    #[error("Hevy API response missing routine ID")]
    MissingRoutineId,
}
