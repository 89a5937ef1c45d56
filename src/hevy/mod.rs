//! Hevy integration: API client, wire types and errors.

mod client;
mod error;
mod types;

pub use client::{HevyApi, HevyClient, DEFAULT_BASE_URL, TOKEN_ENV_VAR};
pub use error::HevyError;
pub use types::{
    created_id, HevyExercise, HevyTemplateName, HevyWorkout, RoutineExercise,
    RoutineFolderPayload, RoutinePayload, TemplatesPage, WorkoutsPage,
};

#[cfg(test)]
pub(crate) mod fake;
