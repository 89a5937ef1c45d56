use serde_json::Value;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::{decode_json, encode_json, format_timestamp, parse_timestamp, RepoResult};
use crate::models::WorkoutPlan;

#[derive(Clone)]
pub struct WorkoutPlanRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct PlanRow {
    id: String,
    start_date: String,
    weeks: i64,
    workouts: String,
}

impl WorkoutPlanRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, plan: &WorkoutPlan) -> RepoResult<String> {
        let id = plan
            .id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        sqlx::query(
            "INSERT INTO workout_plans (id, start_date, weeks, workouts) VALUES (?, ?, ?, ?)",
        )
        .bind(&id)
        .bind(format_timestamp(&plan.start_date))
        .bind(plan.weeks as i64)
        .bind(encode_json(&plan.workouts, "workouts")?)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    pub async fn get(&self, id: &str) -> RepoResult<Option<WorkoutPlan>> {
        let row: Option<PlanRow> = sqlx::query_as(
            "SELECT id, start_date, weeks, workouts FROM workout_plans WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|r| -> RepoResult<_> {
            let workouts: Vec<Value> = decode_json(&r.workouts, "workouts", &r.id)?;
            Ok(WorkoutPlan {
                start_date: parse_timestamp(&r.start_date, "start_date", &r.id)?,
                weeks: r.weeks.max(1) as u32,
                workouts,
                id: Some(r.id),
            })
        })
        .transpose()
    }

    pub async fn update(&self, id: &str, plan: &WorkoutPlan) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE workout_plans SET start_date = ?, weeks = ?, workouts = ? WHERE id = ?",
        )
        .bind(format_timestamp(&plan.start_date))
        .bind(plan.weeks as i64)
        .bind(encode_json(&plan.workouts, "workouts")?)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM workout_plans WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
