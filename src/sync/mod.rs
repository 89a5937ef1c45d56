//! Two-way reconciliation of workouts with Hevy.
//!
//! A sync run pulls recent Hevy workouts into the local store, then pushes
//! recent local workouts back to Hevy as routines. The phases fail
//! independently; see [`SyncRun`].

mod background;
mod error;
mod service;
pub mod transform;

pub use background::{run_background, spawn_background};
pub use error::SyncError;
pub use service::{PullStats, SyncRun, SyncService, SyncSettings, SyncStatus};
