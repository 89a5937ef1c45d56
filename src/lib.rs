//! AI personal trainer backend.
//!
//! Generates workouts with a language model, stores them in SQLite, maps
//! exercise names onto the Hevy catalog and keeps both sides in sync.

pub mod clock;
pub mod config;
pub mod context;
pub mod db;
pub mod generate;
pub mod hevy;
pub mod matching;
pub mod models;
pub mod server;
pub mod sync;
