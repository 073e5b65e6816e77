//! Data models and store queries.
//!
//! Three collections: `users` (accounts, doubling as the collaborator
//! directory), `todo_lists`, and `tasks`. Lists and tasks are related by
//! identifier only — the application always treats a list and its tasks as
//! two independent fetches.

pub mod list;
pub mod task;
pub mod user;
