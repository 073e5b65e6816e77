/// To-do list model and store queries
///
/// A list is owned by exactly one user and carries a set of collaborator
/// records, each holding a single email string. Collaborator entries are
/// stored as a JSONB array of `{"email": "..."}` objects and the
/// shared-with-me query matches them structurally with JSONB containment —
/// the relational equivalent of the document store's array-contains filter.
///
/// Tasks are NOT embedded in the list row; they live in their own table and
/// are related by `list_id` only (see [`crate::models::task`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::auth::identity::Identity;

/// A collaborator record: an email string copied onto the list at add time
///
/// Existence of a matching account is checked once, when the collaborator is
/// added. The record is matched against the current user's email by exact
/// string equality afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collaborator {
    /// Normalized (trimmed, lowercased) email
    pub email: String,
}

/// A to-do list document
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TodoList {
    /// Unique list ID (UUID v4)
    pub id: Uuid,

    /// List title; non-empty by validation
    pub title: String,

    /// Identity id of the owning user
    pub owner_id: Uuid,

    /// Collaborator records granted access to this list
    #[sqlx(json)]
    pub collaborators: Vec<Collaborator>,

    /// When the list was created
    pub created_at: DateTime<Utc>,

    /// When the list row was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new list
#[derive(Debug, Clone)]
pub struct CreateTodoList {
    pub title: String,
    pub owner_id: Uuid,
    pub collaborators: Vec<Collaborator>,
}

impl TodoList {
    /// Creates a new list row
    ///
    /// Takes any executor so it can run inside the create-list transaction
    /// alongside the task inserts.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        data: CreateTodoList,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, TodoList>(
            r#"
            INSERT INTO todo_lists (title, owner_id, collaborators)
            VALUES ($1, $2, $3)
            RETURNING id, title, owner_id, collaborators, created_at, updated_at
            "#,
        )
        .bind(data.title)
        .bind(data.owner_id)
        .bind(Json(data.collaborators))
        .fetch_one(executor)
        .await
    }

    /// Finds a list by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, TodoList>(
            r#"
            SELECT id, title, owner_id, collaborators, created_at, updated_at
            FROM todo_lists
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    /// Lists owned by the given user, oldest first
    pub async fn list_owned_by(pool: &PgPool, owner_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, TodoList>(
            r#"
            SELECT id, title, owner_id, collaborators, created_at, updated_at
            FROM todo_lists
            WHERE owner_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(owner_id)
        .fetch_all(pool)
        .await
    }

    /// Lists where the collaborators array contains an entry equal to
    /// `{email}` for the given email
    ///
    /// No normalization is applied here; the caller passes the identity's
    /// email as-is and matching is structural.
    pub async fn list_shared_with(pool: &PgPool, email: &str) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, TodoList>(
            r#"
            SELECT id, title, owner_id, collaborators, created_at, updated_at
            FROM todo_lists
            WHERE collaborators @> $1
            ORDER BY created_at
            "#,
        )
        .bind(Json(vec![Collaborator {
            email: email.to_string(),
        }]))
        .fetch_all(pool)
        .await
    }

    /// Updates the list title
    ///
    /// Returns the updated row, or None if the list no longer exists.
    pub async fn update_title<'e>(
        executor: impl PgExecutor<'e>,
        id: Uuid,
        title: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, TodoList>(
            r#"
            UPDATE todo_lists
            SET title = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, owner_id, collaborators, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(title)
        .fetch_optional(executor)
        .await
    }

    /// Deletes the list row only
    ///
    /// Child task rows are NOT removed; the parent/child relation carries no
    /// cascade (current application policy).
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM todo_lists WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Whether the given identity may read and modify this list
    ///
    /// True for the owner and for any identity whose email exactly equals a
    /// stored collaborator email.
    pub fn accessible_by(&self, identity: &Identity) -> bool {
        self.owner_id == identity.user_id
            || self.collaborators.iter().any(|c| c.email == identity.email)
    }

    /// Whether the given identity owns this list
    pub fn owned_by(&self, identity: &Identity) -> bool {
        self.owner_id == identity.user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with(owner_id: Uuid, collaborators: Vec<Collaborator>) -> TodoList {
        TodoList {
            id: Uuid::new_v4(),
            title: "Groceries".to_string(),
            owner_id,
            collaborators,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_collaborator_wire_shape() {
        let c = Collaborator {
            email: "viewer@example.com".to_string(),
        };
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, r#"{"email":"viewer@example.com"}"#);
    }

    #[test]
    fn test_accessible_by_owner() {
        let identity = Identity {
            user_id: Uuid::new_v4(),
            email: "owner@example.com".to_string(),
        };
        let list = list_with(identity.user_id, vec![]);
        assert!(list.accessible_by(&identity));
        assert!(list.owned_by(&identity));
    }

    #[test]
    fn test_accessible_by_collaborator_exact_match() {
        let identity = Identity {
            user_id: Uuid::new_v4(),
            email: "viewer@example.com".to_string(),
        };
        let list = list_with(
            Uuid::new_v4(),
            vec![Collaborator {
                email: "viewer@example.com".to_string(),
            }],
        );
        assert!(list.accessible_by(&identity));
        assert!(!list.owned_by(&identity));
    }

    #[test]
    fn test_accessible_by_rejects_case_variant() {
        // Membership is exact structural match: no normalization at query time.
        let identity = Identity {
            user_id: Uuid::new_v4(),
            email: "Viewer@Example.com".to_string(),
        };
        let list = list_with(
            Uuid::new_v4(),
            vec![Collaborator {
                email: "viewer@example.com".to_string(),
            }],
        );
        assert!(!list.accessible_by(&identity));
    }
}
