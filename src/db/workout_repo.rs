use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{decode_json, encode_json, format_timestamp, parse_timestamp, RepoResult};
use crate::clock::{Clock, SystemClock};
use crate::models::{ExerciseEntry, Workout};

/// Workouts table. Writes stamp `updated_at` from the repository's clock.
#[derive(Clone)]
pub struct WorkoutRepository {
    pool: SqlitePool,
    clock: Arc<dyn Clock>,
}

#[derive(sqlx::FromRow)]
struct WorkoutRow {
    id: String,
    date: String,
    exercises: String,
}

impl WorkoutRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self::with_clock(pool, Arc::new(SystemClock))
    }

    pub fn with_clock(pool: SqlitePool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }

    /// Inserts a workout and returns its id.
    ///
    /// A new UUID is assigned only when the workout has none, so workouts
    /// pulled from Hevy keep their remote id.
    pub async fn create(&self, workout: &Workout) -> RepoResult<String> {
        let id = workout
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        let exercises = encode_json(&workout.exercises, "exercises")?;

        sqlx::query(
            "INSERT INTO workouts (id, date, exercises, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(format_timestamp(&workout.date))
        .bind(&exercises)
        .bind(format_timestamp(&self.clock.now()))
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn get(&self, id: &str) -> RepoResult<Option<Workout>> {
        let row: Option<WorkoutRow> =
            sqlx::query_as("SELECT id, date, exercises FROM workouts WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(hydrate_workout).transpose()
    }

    /// Replaces the date and exercise list. Returns false if no row matched.
    pub async fn update(&self, id: &str, workout: &Workout) -> RepoResult<bool> {
        let exercises = encode_json(&workout.exercises, "exercises")?;

        let result = sqlx::query(
            "UPDATE workouts SET date = ?, exercises = ?, updated_at = ? WHERE id = ?",
        )
        .bind(format_timestamp(&workout.date))
        .bind(&exercises)
        .bind(format_timestamp(&self.clock.now()))
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Returns false if no row matched.
    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list(&self) -> RepoResult<Vec<Workout>> {
        let rows: Vec<WorkoutRow> =
            sqlx::query_as("SELECT id, date, exercises FROM workouts ORDER BY date DESC")
                .fetch_all(&self.pool)
                .await?;

        rows.into_iter().map(hydrate_workout).collect()
    }

    /// Workouts created or updated within the last `days` days, newest first.
    pub async fn list_recent(&self, days: i64) -> RepoResult<Vec<Workout>> {
        self.list_since(self.clock.now() - Duration::days(days)).await
    }

    /// Workouts created or updated at or after `cutoff`, newest first.
    pub async fn list_since(&self, cutoff: DateTime<Utc>) -> RepoResult<Vec<Workout>> {
        let rows: Vec<WorkoutRow> = sqlx::query_as(
            "SELECT id, date, exercises FROM workouts WHERE updated_at >= ? ORDER BY date DESC",
        )
        .bind(format_timestamp(&cutoff))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(hydrate_workout).collect()
    }
}

fn hydrate_workout(row: WorkoutRow) -> RepoResult<Workout> {
    let date = parse_timestamp(&row.date, "date", &row.id)?;
    let exercises: Vec<ExerciseEntry> = decode_json(&row.exercises, "exercises", &row.id)?;

    Ok(Workout {
        id: Some(row.id),
        date,
        exercises,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::{setup_db, TestDb};
    use crate::models::Sets;
    use chrono::TimeZone;
    use serde_json::json;

    struct TestContext {
        repo: WorkoutRepository,
        db: TestDb,
    }

    async fn setup_repo() -> TestContext {
        let db = setup_db().await;
        TestContext {
            repo: WorkoutRepository::new(db.pool.clone()),
            db,
        }
    }

    fn sample_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 10, 18, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_create_assigns_id_when_missing() {
        let ctx = setup_repo().await;

        let id = ctx.repo.create(&Workout::new(sample_date())).await.unwrap();
        assert!(Uuid::parse_str(&id).is_ok());

        let fetched = ctx.repo.get(&id).await.unwrap().unwrap();
        assert_eq!(fetched.id.as_deref(), Some(id.as_str()));
        assert_eq!(fetched.date, sample_date());
    }

    #[tokio::test]
    async fn test_create_keeps_provided_id() {
        let ctx = setup_repo().await;

        let workout = Workout::new(sample_date()).with_id("hevy-123");
        let id = ctx.repo.create(&workout).await.unwrap();
        assert_eq!(id, "hevy-123");
        assert!(ctx.repo.get("hevy-123").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_nested_exercises_round_trip() {
        let ctx = setup_repo().await;

        let exercises: Vec<ExerciseEntry> = serde_json::from_value(json!([
            {
                "name": "Bench Press",
                "sets": [
                    {"reps": 8, "weight": 60, "type": "normal"},
                    {"reps": 6, "weight": 65.5, "type": "normal"}
                ],
                "notes": "paused reps"
            },
            {"name": "Push-ups", "sets": 3, "reps": "8-12", "cues": ["elbows in", {"depth": "chest"}]}
        ]))
        .unwrap();

        let workout = Workout::new(sample_date()).with_exercises(exercises.clone());
        let id = ctx.repo.create(&workout).await.unwrap();

        let fetched = ctx.repo.get(&id).await.unwrap().unwrap();
        assert_eq!(fetched.exercises, exercises);
        assert_eq!(
            serde_json::to_value(&fetched.exercises).unwrap(),
            serde_json::to_value(&exercises).unwrap()
        );
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let ctx = setup_repo().await;
        assert!(ctx.repo.get("nope").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_replaces_whole_workout() {
        let ctx = setup_repo().await;

        let original = Workout::new(sample_date()).with_exercises(vec![
            ExerciseEntry::named("Squat").with_sets(Sets::Count(5)),
            ExerciseEntry::named("Deadlift"),
        ]);
        let id = ctx.repo.create(&original).await.unwrap();

        let new_date = sample_date() + Duration::days(1);
        let replacement = Workout::new(new_date)
            .with_exercises(vec![ExerciseEntry::named("Row").with_reps(10)]);
        assert!(ctx.repo.update(&id, &replacement).await.unwrap());

        let fetched = ctx.repo.get(&id).await.unwrap().unwrap();
        assert_eq!(fetched.date, new_date);
        assert_eq!(fetched.exercises.len(), 1);
        assert_eq!(fetched.exercises[0].name.as_deref(), Some("Row"));
    }

    #[tokio::test]
    async fn test_update_missing_returns_false() {
        let ctx = setup_repo().await;
        let updated = ctx
            .repo
            .update("missing", &Workout::new(sample_date()))
            .await
            .unwrap();
        assert!(!updated);
    }

    #[tokio::test]
    async fn test_delete() {
        let ctx = setup_repo().await;

        let id = ctx.repo.create(&Workout::new(sample_date())).await.unwrap();
        assert!(ctx.repo.delete(&id).await.unwrap());
        assert!(ctx.repo.get(&id).await.unwrap().is_none());
        assert!(!ctx.repo.delete(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_list_recent_filters_by_write_time() {
        let ctx = setup_repo().await;

        let fresh = ctx
            .repo
            .create(&Workout::new(sample_date()).with_id("fresh"))
            .await
            .unwrap();
        ctx.repo
            .create(&Workout::new(sample_date()).with_id("stale"))
            .await
            .unwrap();

        // Age the second row past the window
        let old = format_timestamp(&(Utc::now() - Duration::days(30)));
        sqlx::query("UPDATE workouts SET updated_at = ? WHERE id = 'stale'")
            .bind(&old)
            .execute(&ctx.db.pool)
            .await
            .unwrap();

        let recent = ctx.repo.list_recent(7).await.unwrap();
        let ids: Vec<_> = recent.iter().filter_map(|w| w.id.clone()).collect();
        assert_eq!(ids, vec![fresh]);

        assert_eq!(ctx.repo.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_write_time_comes_from_clock() {
        let db = setup_db().await;
        let clock = Arc::new(crate::clock::ManualClock::new(sample_date()));
        let repo = WorkoutRepository::with_clock(db.pool.clone(), clock.clone());

        repo.create(&Workout::new(sample_date()).with_id("w1"))
            .await
            .unwrap();
        assert_eq!(repo.list_recent(7).await.unwrap().len(), 1);

        clock.advance(Duration::days(8));
        assert!(repo.list_recent(7).await.unwrap().is_empty());

        let stamped: (String,) = sqlx::query_as("SELECT updated_at FROM workouts WHERE id = 'w1'")
            .fetch_one(&db.pool)
            .await
            .unwrap();
        assert_eq!(stamped.0, format_timestamp(&sample_date()));

        // Updating re-stamps at the clock's current time
        assert!(repo
            .update("w1", &Workout::new(sample_date()))
            .await
            .unwrap());
        assert_eq!(repo.list_recent(7).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_orders_newest_date_first() {
        let ctx = setup_repo().await;

        ctx.repo
            .create(&Workout::new(sample_date()).with_id("older"))
            .await
            .unwrap();
        ctx.repo
            .create(&Workout::new(sample_date() + Duration::days(2)).with_id("newer"))
            .await
            .unwrap();

        let ids: Vec<_> = ctx
            .repo
            .list_recent(7)
            .await
            .unwrap()
            .into_iter()
            .filter_map(|w| w.id)
            .collect();
        assert_eq!(ids, vec!["newer".to_string(), "older".to_string()]);
    }

    #[tokio::test]
    async fn test_malformed_exercises_surface_decode_error() {
        let ctx = setup_repo().await;

        sqlx::query("INSERT INTO workouts (id, date, exercises, updated_at) VALUES ('bad', ?, 'not json', ?)")
            .bind(format_timestamp(&sample_date()))
            .bind(format_timestamp(&Utc::now()))
            .execute(&ctx.db.pool)
            .await
            .unwrap();

        let err = ctx.repo.get("bad").await.unwrap_err();
        assert!(matches!(err, crate::db::RepoError::Decode { field: "exercises", .. }));
    }
}
