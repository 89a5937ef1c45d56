use sqlx::SqlitePool;
use uuid::Uuid;

use super::RepoResult;
use crate::models::Goal;

#[derive(Clone)]
pub struct GoalRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct GoalRow {
    name: String,
    description: String,
    template_id: String,
}

impl GoalRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, goal: &Goal) -> RepoResult<String> {
        let id = Uuid::new_v4().to_string();
        sqlx::query("INSERT INTO goals (id, name, description, template_id) VALUES (?, ?, ?, ?)")
            .bind(&id)
            .bind(&goal.name)
            .bind(&goal.description)
            .bind(&goal.template_id)
            .execute(&self.pool)
            .await?;
        Ok(id)
    }

    pub async fn get(&self, id: &str) -> RepoResult<Option<Goal>> {
        let row: Option<GoalRow> =
            sqlx::query_as("SELECT name, description, template_id FROM goals WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|r| Goal {
            name: r.name,
            description: r.description,
            template_id: r.template_id,
        }))
    }

    pub async fn update(&self, id: &str, goal: &Goal) -> RepoResult<bool> {
        let result = sqlx::query(
            "UPDATE goals SET name = ?, description = ?, template_id = ? WHERE id = ?",
        )
        .bind(&goal.name)
        .bind(&goal.description)
        .bind(&goal.template_id)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM goals WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::setup_db;

    #[tokio::test]
    async fn test_goal_crud() {
        let db = setup_db().await;
        let repo = GoalRepository::new(db.pool.clone());

        let goal = Goal {
            name: "Strength".into(),
            description: "Get stronger".into(),
            template_id: "t1".into(),
        };
        let id = repo.create(&goal).await.unwrap();
        assert_eq!(repo.get(&id).await.unwrap(), Some(goal.clone()));

        let renamed = Goal {
            name: "Power".into(),
            ..goal
        };
        assert!(repo.update(&id, &renamed).await.unwrap());
        assert_eq!(repo.get(&id).await.unwrap().unwrap().name, "Power");

        assert!(repo.delete(&id).await.unwrap());
        assert!(!repo.delete(&id).await.unwrap());
    }
}
