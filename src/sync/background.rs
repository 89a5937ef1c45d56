use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use super::SyncService;

/// Runs a sync cycle, sleeps for `interval`, and repeats forever.
///
/// Each cycle runs in its own task, so a panicking cycle is logged and the
/// loop carries on with the next one.
pub async fn run_background(service: Arc<SyncService>, interval: Duration) {
    tracing::info!(
        "Starting background Hevy sync task (interval: {:.1} hours)",
        interval.as_secs_f64() / 3600.0
    );

    loop {
        let cycle = Arc::clone(&service);
        match tokio::spawn(async move { cycle.run_sync().await }).await {
            Ok(run) => tracing::info!(
                pull_success = run.pull_success,
                push_success = run.push_success,
                pushed = run.pushed_workout_count,
                "background sync finished"
            ),
            Err(e) => tracing::error!("Background sync failed: {}", e),
        }

        tokio::time::sleep(interval).await;
    }
}

/// Starts [`run_background`] on the runtime using the service's own interval.
pub fn spawn_background(service: Arc<SyncService>) -> JoinHandle<()> {
    let interval = service.settings().interval;
    tokio::spawn(run_background(service, interval))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::SystemClock;
    use crate::db::test_support::setup_db;
    use crate::db::WorkoutRepository;
    use crate::hevy::fake::FakeHevy;
    use crate::sync::SyncSettings;
    use std::sync::atomic::Ordering;

    #[tokio::test]
    async fn test_background_loop_repeats_and_survives_failures() {
        let db = setup_db().await;
        let fake = Arc::new(FakeHevy::default());
        fake.fail_workouts.store(true, Ordering::SeqCst);

        let service = Arc::new(SyncService::new(
            fake.clone(),
            WorkoutRepository::new(db.pool.clone()),
            Arc::new(SystemClock),
            SyncSettings::default(),
        ));

        let handle = tokio::spawn(run_background(
            Arc::clone(&service),
            Duration::from_millis(10),
        ));
        tokio::time::sleep(Duration::from_millis(200)).await;
        handle.abort();

        assert!(fake.workout_calls.load(Ordering::SeqCst) >= 2);
        assert!(service.last_sync_time().is_some());
    }
}
