use std::sync::{Arc, Mutex};
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use super::transform::{routine_from_workout, workout_from_hevy};
use super::SyncError;
use crate::clock::Clock;
use crate::db::{RepoError, WorkoutRepository};
use crate::hevy::{created_id, HevyApi, HevyError, HevyWorkout};
use crate::models::Workout;

/// Window and paging parameters for a sync run.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    /// Remote workouts created within this many days are pulled.
    pub pull_days: i64,
    pub pull_page_size: u32,
    /// Local workouts touched within this many days are pushed.
    pub push_days: i64,
    /// Pause between background runs.
    pub interval: StdDuration,
}

impl Default for SyncSettings {
    fn default() -> Self {
        Self {
            pull_days: 30,
            pull_page_size: 50,
            push_days: 7,
            interval: StdDuration::from_secs(6 * 3600),
        }
    }
}

impl SyncSettings {
    pub fn with_interval_hours(mut self, hours: u64) -> Self {
        self.interval = StdDuration::from_secs(hours.saturating_mul(3600));
        self
    }
}

/// Upsert counts for one pull phase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PullStats {
    pub fetched: usize,
    pub created: usize,
    pub updated: usize,
    pub failed: usize,
    /// Set when paging stopped early on a fetch error; the workouts from
    /// earlier pages were still stored.
    pub page_error: Option<String>,
}

/// Outcome of one pull-then-push cycle.
#[derive(Debug, Clone, Serialize)]
pub struct SyncRun {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub duration_seconds: f64,
    pub pull_success: bool,
    pub push_success: bool,
    pub pull_error: Option<String>,
    pub push_error: Option<String>,
    pub pushed_workout_count: usize,
    pub pull: PullStats,
}

/// Snapshot reported by the status endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct SyncStatus {
    pub last_sync_time: Option<DateTime<Utc>>,
    pub interval_hours: f64,
}

enum Upsert {
    Created,
    Updated,
    UpdateFailed,
}

/// Reconciles local workouts with Hevy.
///
/// Pull copies recent Hevy workouts into the local store keyed by their
/// Hevy id; push submits recent local workouts to Hevy as routines.
pub struct SyncService {
    api: Arc<dyn HevyApi>,
    workouts: WorkoutRepository,
    clock: Arc<dyn Clock>,
    settings: SyncSettings,
    last_sync_time: Mutex<Option<DateTime<Utc>>>,
    run_lock: tokio::sync::Mutex<()>,
}

impl SyncService {
    pub fn new(
        api: Arc<dyn HevyApi>,
        workouts: WorkoutRepository,
        clock: Arc<dyn Clock>,
        settings: SyncSettings,
    ) -> Self {
        Self {
            api,
            workouts,
            clock,
            settings,
            last_sync_time: Mutex::new(None),
            run_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    pub fn last_sync_time(&self) -> Option<DateTime<Utc>> {
        *self.last_sync_time.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn status(&self) -> SyncStatus {
        SyncStatus {
            last_sync_time: self.last_sync_time(),
            interval_hours: self.settings.interval.as_secs_f64() / 3600.0,
        }
    }

    /// Runs pull then push. Both phases are always attempted and neither
    /// phase's failure is returned as an error.
    ///
    /// Concurrent callers wait for the running cycle to finish.
    pub async fn run_sync(&self) -> SyncRun {
        let _guard = self.run_lock.lock().await;

        let start_time = self.clock.now();
        tracing::info!("Starting Hevy sync at {}", start_time.to_rfc3339());

        let (pull, pull_error) = match self.pull().await {
            Ok(stats) => {
                tracing::info!(
                    "Hevy pull completed: {} new, {} updated, {} errors",
                    stats.created,
                    stats.updated,
                    stats.failed
                );
                let page_error = stats.page_error.clone();
                (stats, page_error)
            }
            Err(e) => {
                tracing::error!("Hevy pull failed: {}", e);
                (PullStats::default(), Some(e.to_string()))
            }
        };

        let (pushed_workout_count, push_error) = match self.push().await {
            Ok(count) => {
                tracing::info!("Hevy push completed: pushed {} workouts", count);
                (count, None)
            }
            Err(e) => {
                tracing::error!("Hevy push failed: {}", e);
                (0, Some(e.to_string()))
            }
        };

        let end_time = self.clock.now();
        let duration_seconds = (end_time - start_time).num_milliseconds() as f64 / 1000.0;
        *self.last_sync_time.lock().unwrap_or_else(|e| e.into_inner()) = Some(end_time);

        tracing::info!(
            "Hevy sync completed at {} (duration: {:.2}s)",
            end_time.to_rfc3339(),
            duration_seconds
        );

        SyncRun {
            start_time,
            end_time,
            duration_seconds,
            pull_success: pull_error.is_none(),
            push_success: push_error.is_none(),
            pull_error,
            push_error,
            pushed_workout_count,
            pull,
        }
    }

    /// Copies recent Hevy workouts into the local store.
    ///
    /// A fetch error stops paging. Workouts from pages already read are
    /// still stored and the error is reported in `page_error`; the phase
    /// only fails when nothing could be fetched at all.
    pub async fn pull(&self) -> Result<PullStats, SyncError> {
        let cutoff = self.clock.now() - Duration::days(self.settings.pull_days);
        let (remote, page_error) = self.fetch_since(cutoff).await;
        let page_error = match page_error {
            Some(e) if remote.is_empty() => return Err(e.into()),
            other => other.map(|e| e.to_string()),
        };
        tracing::info!("Fetched {} workouts from Hevy", remote.len());

        let mut stats = PullStats {
            fetched: remote.len(),
            page_error,
            ..Default::default()
        };

        for hevy_workout in &remote {
            let workout = workout_from_hevy(hevy_workout);
            match self.upsert(&hevy_workout.id, &workout).await {
                Ok(Upsert::Created) => stats.created += 1,
                Ok(Upsert::Updated) => stats.updated += 1,
                Ok(Upsert::UpdateFailed) => {
                    stats.failed += 1;
                    tracing::warn!("Failed to upsert workout {}: update_failed", hevy_workout.id);
                }
                Err(e) => {
                    stats.failed += 1;
                    tracing::error!("Error upserting workout {}: {}", hevy_workout.id, e);
                }
            }
        }

        Ok(stats)
    }

    /// Pages through Hevy workouts, newest first, until one is older than
    /// `cutoff`, the pages run out or a page cannot be fetched.
    async fn fetch_since(&self, cutoff: DateTime<Utc>) -> (Vec<HevyWorkout>, Option<HevyError>) {
        let page_size = self.settings.pull_page_size;
        let mut kept = Vec::new();
        let mut page = 1;

        loop {
            let batch = match self.api.list_workouts(page, page_size).await {
                Ok(response) => response.workouts,
                Err(e) => {
                    tracing::error!("Error fetching Hevy workouts page {}: {}", page, e);
                    return (kept, Some(e));
                }
            };
            if batch.is_empty() {
                break;
            }

            let batch_len = batch.len();
            let mut reached_cutoff = false;
            for workout in batch {
                if workout.created_at >= cutoff {
                    kept.push(workout);
                } else {
                    reached_cutoff = true;
                    break;
                }
            }

            if reached_cutoff || batch_len < page_size as usize {
                break;
            }
            page += 1;
        }

        (kept, None)
    }

    async fn upsert(&self, id: &str, workout: &Workout) -> Result<Upsert, RepoError> {
        if self.workouts.get(id).await?.is_some() {
            if self.workouts.update(id, workout).await? {
                Ok(Upsert::Updated)
            } else {
                Ok(Upsert::UpdateFailed)
            }
        } else {
            self.workouts.create(workout).await?;
            Ok(Upsert::Created)
        }
    }

    /// Submits recently touched local workouts as Hevy routines and returns
    /// how many were accepted.
    pub async fn push(&self) -> Result<usize, SyncError> {
        let cutoff = self.clock.now() - Duration::days(self.settings.push_days);
        let recent = self.workouts.list_since(cutoff).await?;

        let mut pushed = 0;
        for workout in &recent {
            let id = workout.id.as_deref().unwrap_or("<unsaved>");
            match self.submit_routine(workout).await {
                Ok(routine_id) => {
                    tracing::debug!("Pushed workout {} as routine {}", id, routine_id);
                    pushed += 1;
                }
                Err(e) => tracing::warn!("Failed to push workout {}: {}", id, e),
            }
        }

        Ok(pushed)
    }

    /// Pushes one stored workout and returns the routine id Hevy assigned.
    pub async fn push_workout(&self, workout_id: &str) -> Result<String, SyncError> {
        let workout = self
            .workouts
            .get(workout_id)
            .await?
            .ok_or_else(|| SyncError::WorkoutNotFound(workout_id.to_string()))?;

        self.submit_routine(&workout).await
    }

    async fn submit_routine(&self, workout: &Workout) -> Result<String, SyncError> {
        let payload = routine_from_workout(workout);
        let response = self.api.create_routine(&payload).await?;
        created_id(&response).ok_or(SyncError::MissingRoutineId)
    }
}
