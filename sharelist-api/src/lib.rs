//! # sharelist-api
//!
//! HTTP service for sharelist: registration/login, list and task CRUD with
//! collaborator sharing, and SSE live streams for the listing view.

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
