/// Task model and store queries
///
/// Every task is a child of exactly one to-do list, related by `list_id`
/// alone. Tasks are created in bulk when a list is first saved and edited,
/// toggled, or deleted individually afterward.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

/// A task document
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID (UUID v4)
    pub id: Uuid,

    /// Parent list ID
    pub list_id: Uuid,

    /// Task title; non-empty, unique within the list at creation time
    pub title: String,

    /// Task description; at least 3 characters after trimming
    pub description: String,

    /// Completion flag
    pub done: bool,

    /// When the task was created
    pub created_at: DateTime<Utc>,
}

/// Input for creating a task under a list
#[derive(Debug, Clone)]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub done: bool,
}

impl Task {
    /// Creates a task under the given list
    ///
    /// Takes any executor so bulk creation runs inside the create-list
    /// transaction.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        list_id: Uuid,
        data: CreateTask,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            INSERT INTO tasks (list_id, title, description, done)
            VALUES ($1, $2, $3, $4)
            RETURNING id, list_id, title, description, done, created_at
            "#,
        )
        .bind(list_id)
        .bind(data.title)
        .bind(data.description)
        .bind(data.done)
        .fetch_one(executor)
        .await
    }

    /// Fetches the full task set of a list, oldest first
    ///
    /// This is the query each live subscription re-runs on every change
    /// delivery for its list.
    pub async fn list_for_list(pool: &PgPool, list_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            SELECT id, list_id, title, description, done, created_at
            FROM tasks
            WHERE list_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(list_id)
        .fetch_all(pool)
        .await
    }

    /// Updates a task's title and description
    ///
    /// Scoped to the list so a task id from another list cannot be updated
    /// through the wrong parent. Returns None if no such task exists.
    pub async fn update<'e>(
        executor: impl PgExecutor<'e>,
        list_id: Uuid,
        task_id: Uuid,
        title: &str,
        description: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET title = $3, description = $4
            WHERE id = $2 AND list_id = $1
            RETURNING id, list_id, title, description, done, created_at
            "#,
        )
        .bind(list_id)
        .bind(task_id)
        .bind(title)
        .bind(description)
        .fetch_optional(executor)
        .await
    }

    /// Flips the task's `done` flag, returning the updated row
    ///
    /// The flip happens in the store; callers observe the new value through
    /// the live subscription rather than an optimistic local update.
    pub async fn toggle_done(
        pool: &PgPool,
        list_id: Uuid,
        task_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Task>(
            r#"
            UPDATE tasks
            SET done = NOT done
            WHERE id = $2 AND list_id = $1
            RETURNING id, list_id, title, description, done, created_at
            "#,
        )
        .bind(list_id)
        .bind(task_id)
        .fetch_optional(pool)
        .await
    }

    /// Deletes one task
    pub async fn delete(pool: &PgPool, list_id: Uuid, task_id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $2 AND list_id = $1")
            .bind(list_id)
            .bind(task_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Counts the remaining tasks of a list
    ///
    /// Re-queried once after a task delete to decide the last-task list
    /// cascade.
    pub async fn count_for_list(pool: &PgPool, list_id: Uuid) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks WHERE list_id = $1")
            .bind(list_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_serialization_shape() {
        let task = Task {
            id: Uuid::new_v4(),
            list_id: Uuid::new_v4(),
            title: "Milk".to_string(),
            description: "2 liters".to_string(),
            done: false,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["title"], "Milk");
        assert_eq!(json["description"], "2 liters");
        assert_eq!(json["done"], false);
    }
}
