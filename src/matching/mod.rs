//! Exercise name reconciliation against the Hevy template catalog.

pub mod cache;
pub mod matcher;
pub mod similarity;

pub use cache::TemplateCache;
pub use matcher::{best_match, ExerciseMatcher, DEFAULT_THRESHOLD};
