//! HTTP route handlers.

pub mod auth;
pub mod health;
pub mod lists;
pub mod stream;
pub mod tasks;
pub mod users;
