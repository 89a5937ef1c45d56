use sqlx::SqlitePool;

use super::RepoResult;
use crate::models::ExerciseTemplateRef;

/// Local references to Hevy exercise templates, keyed by template id.
#[derive(Clone)]
pub struct TemplateRefRepository {
    pool: SqlitePool,
}

#[derive(sqlx::FromRow)]
struct TemplateRefRow {
    template_id: String,
    name: String,
}

impl TemplateRefRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, template: &ExerciseTemplateRef) -> RepoResult<String> {
        sqlx::query("INSERT INTO exercise_template_refs (template_id, name) VALUES (?, ?)")
            .bind(&template.template_id)
            .bind(&template.name)
            .execute(&self.pool)
            .await?;
        Ok(template.template_id.clone())
    }

    pub async fn get(&self, template_id: &str) -> RepoResult<Option<ExerciseTemplateRef>> {
        let row: Option<TemplateRefRow> = sqlx::query_as(
            "SELECT template_id, name FROM exercise_template_refs WHERE template_id = ?",
        )
        .bind(template_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| ExerciseTemplateRef {
            template_id: r.template_id,
            name: r.name,
        }))
    }

    pub async fn list(&self) -> RepoResult<Vec<ExerciseTemplateRef>> {
        let rows: Vec<TemplateRefRow> =
            sqlx::query_as("SELECT template_id, name FROM exercise_template_refs ORDER BY name")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|r| ExerciseTemplateRef {
                template_id: r.template_id,
                name: r.name,
            })
            .collect())
    }

    pub async fn update(&self, template_id: &str, template: &ExerciseTemplateRef) -> RepoResult<bool> {
        let result = sqlx::query("UPDATE exercise_template_refs SET name = ? WHERE template_id = ?")
            .bind(&template.name)
            .bind(template_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete(&self, template_id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM exercise_template_refs WHERE template_id = ?")
            .bind(template_id)
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
    async fn test_template_ref_crud() {
        let db = setup_db().await;
        let repo = TemplateRefRepository::new(db.pool.clone());

        let squat = ExerciseTemplateRef {
            template_id: "t1".into(),
            name: "Squat".into(),
        };
        assert_eq!(repo.create(&squat).await.unwrap(), "t1");
        repo.create(&ExerciseTemplateRef {
            template_id: "t0".into(),
            name: "Bench Press".into(),
        })
        .await
        .unwrap();

        let names: Vec<_> = repo.list().await.unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Bench Press", "Squat"]);

        let renamed = ExerciseTemplateRef {
            template_id: "t1".into(),
            name: "Back Squat".into(),
        };
        assert!(repo.update("t1", &renamed).await.unwrap());
        assert_eq!(repo.get("t1").await.unwrap(), Some(renamed));

        assert!(repo.delete("t1").await.unwrap());
        assert!(repo.get("t1").await.unwrap().is_none());
    }
}
