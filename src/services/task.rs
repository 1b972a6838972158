use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewTask, Task, TaskChanges};

const TASK_COLUMNS: &str =
    "id, title, description, status, level, user_id, category_id, created_at, updated_at";

/// Task persistence.
///
/// Like categories, only `get_all` filters by owner.
pub struct TaskService {
    pool: PgPool,
}

impl TaskService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self, user_id: Uuid) -> Result<Vec<Task>, AppError> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE user_id = $1 ORDER BY created_at",
            TASK_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Task, AppError> {
        sqlx::query_as::<_, Task>(&format!("SELECT {} FROM tasks WHERE id = $1", TASK_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))
    }

    /// Inserts a task owned by `user_id`. A `category_id` that does not exist is
    /// rejected by the foreign key and reported as a database error.
    pub async fn create(&self, user_id: Uuid, task: NewTask) -> Result<Task, AppError> {
        let created = sqlx::query_as::<_, Task>(&format!(
            "INSERT INTO tasks (id, title, description, status, level, user_id, category_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(task.title)
        .bind(task.description)
        .bind(task.status)
        .bind(task.level)
        .bind(user_id)
        .bind(task.category_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(created)
    }

    /// Applies a partial update. Omitted fields keep their stored value; the
    /// category is always replaced.
    pub async fn update(&self, id: Uuid, changes: TaskChanges) -> Result<Task, AppError> {
        sqlx::query_as::<_, Task>(&format!(
            "UPDATE tasks SET \
                title = COALESCE($1, title), \
                description = COALESCE($2, description), \
                status = COALESCE($3, status), \
                level = COALESCE($4, level), \
                category_id = $5, \
                updated_at = NOW() \
             WHERE id = $6 RETURNING {}",
            TASK_COLUMNS
        ))
        .bind(changes.title)
        .bind(changes.description)
        .bind(changes.status)
        .bind(changes.level)
        .bind(changes.category_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Task not found".into()));
        }
        Ok(())
    }
}
