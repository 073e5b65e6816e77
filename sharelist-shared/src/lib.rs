//! # sharelist-shared
//!
//! Shared library for the sharelist service: data models and store queries,
//! authentication (passwords, JWTs, identity context), database pool and
//! migrations, the in-process change hub, the list aggregator, and the
//! form validation rules.

pub mod aggregator;
pub mod auth;
pub mod db;
pub mod draft;
pub mod models;
pub mod notify;
