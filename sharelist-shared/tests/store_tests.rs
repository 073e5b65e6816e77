/// Store-level integration tests
///
/// These tests require a running PostgreSQL database.
/// Run with: cargo test --test store_tests
///
/// Database URL is taken from the DATABASE_URL environment variable; tests
/// are skipped when it is not set.

use sharelist_shared::aggregator::{ListAggregator, ListUpdate};
use sharelist_shared::auth::identity::Identity;
use sharelist_shared::db::migrations::run_migrations;
use sharelist_shared::models::list::{Collaborator, CreateTodoList, TodoList};
use sharelist_shared::models::task::{CreateTask, Task};
use sharelist_shared::notify::{ChangeHub, ChangeKind};
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

/// Connects and migrates, or None when no database is configured
async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("Failed to connect to test database");
    run_migrations(&pool).await.expect("Failed to run migrations");
    Some(pool)
}

async fn create_list_with_task(
    pool: &PgPool,
    owner_id: Uuid,
    collaborators: Vec<Collaborator>,
) -> (TodoList, Task) {
    let list = TodoList::create(
        pool,
        CreateTodoList {
            title: "Groceries".to_string(),
            owner_id,
            collaborators,
        },
    )
    .await
    .unwrap();

    let task = Task::create(
        pool,
        list.id,
        CreateTask {
            title: "Milk".to_string(),
            description: "2 liters".to_string(),
            done: false,
        },
    )
    .await
    .unwrap();

    (list, task)
}

async fn cleanup_list(pool: &PgPool, list_id: Uuid) {
    sqlx::query("DELETE FROM tasks WHERE list_id = $1")
        .bind(list_id)
        .execute(pool)
        .await
        .unwrap();
    TodoList::delete(pool, list_id).await.unwrap();
}

/// A created list and task come back from the store unchanged
#[tokio::test]
async fn test_groceries_with_milk_persists() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let owner_id = Uuid::new_v4();
    let (list, task) = create_list_with_task(&pool, owner_id, vec![]).await;

    let found = TodoList::find_by_id(&pool, list.id).await.unwrap().unwrap();
    assert_eq!(found.title, "Groceries");
    assert_eq!(found.owner_id, owner_id);
    assert!(found.collaborators.is_empty());

    let tasks = Task::list_for_list(&pool, list.id).await.unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, task.id);
    assert_eq!(tasks[0].title, "Milk");
    assert_eq!(tasks[0].description, "2 liters");
    assert!(!tasks[0].done);

    cleanup_list(&pool, list.id).await;
}

/// The shared-with query matches the stored `{email}` entry exactly and
/// does not normalize at query time
#[tokio::test]
async fn test_shared_with_containment_query() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let email = format!("viewer-{}@example.com", Uuid::new_v4());
    let (list, _) = create_list_with_task(
        &pool,
        Uuid::new_v4(),
        vec![Collaborator {
            email: email.clone(),
        }],
    )
    .await;

    let shared = TodoList::list_shared_with(&pool, &email).await.unwrap();
    assert!(shared.iter().any(|l| l.id == list.id));

    // Exact structural match: a case variant of the stored entry misses.
    let variant = email.replace("viewer", "Viewer");
    let shared = TodoList::list_shared_with(&pool, &variant).await.unwrap();
    assert!(!shared.iter().any(|l| l.id == list.id));

    cleanup_list(&pool, list.id).await;
}

/// Toggling a task flips `done` in the store and the live subscription
/// re-delivers the new state
#[tokio::test]
async fn test_toggle_observed_through_live_subscription() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let identity = Identity {
        user_id: Uuid::new_v4(),
        email: format!("owner-{}@example.com", Uuid::new_v4()),
    };
    let (list, task) = create_list_with_task(&pool, identity.user_id, vec![]).await;

    let hub = ChangeHub::default();
    let mut aggregator = ListAggregator::open(pool.clone(), &hub, &identity)
        .await
        .unwrap();

    let view = aggregator.view(list.id).await.unwrap();
    assert!(!view.tasks[0].done);

    let toggled = Task::toggle_done(&pool, list.id, task.id)
        .await
        .unwrap()
        .unwrap();
    assert!(toggled.done);
    hub.publish(list.id, ChangeKind::TasksChanged);

    assert_eq!(
        aggregator.next_update().await,
        Some(ListUpdate::TasksReplaced(list.id))
    );
    let view = aggregator.view(list.id).await.unwrap();
    assert!(view.tasks[0].done);

    // And back again.
    Task::toggle_done(&pool, list.id, task.id).await.unwrap();
    hub.publish(list.id, ChangeKind::TasksChanged);

    assert_eq!(
        aggregator.next_update().await,
        Some(ListUpdate::TasksReplaced(list.id))
    );
    let view = aggregator.view(list.id).await.unwrap();
    assert!(!view.tasks[0].done);

    drop(aggregator);
    cleanup_list(&pool, list.id).await;
}

/// Deleting a list removes only the list row; its task rows stay behind
#[tokio::test]
async fn test_delete_list_leaves_task_rows() {
    let Some(pool) = test_pool().await else {
        return;
    };

    let (list, task) = create_list_with_task(&pool, Uuid::new_v4(), vec![]).await;

    assert!(TodoList::delete(&pool, list.id).await.unwrap());
    assert!(TodoList::find_by_id(&pool, list.id).await.unwrap().is_none());

    let orphans = Task::list_for_list(&pool, list.id).await.unwrap();
    assert_eq!(orphans.len(), 1);
    assert_eq!(orphans[0].id, task.id);

    sqlx::query("DELETE FROM tasks WHERE list_id = $1")
        .bind(list.id)
        .execute(&pool)
        .await
        .unwrap();
}
