//! # TeamFlow Shared Library
//!
//! Domain types, storage and business logic behind the TeamFlow API server.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, session tokens, request identity
//! - `models`: Database records and their SQL
//! - `store`: Storage traits with PostgreSQL and in-memory backends
//! - `services`: Registration, login and ownership-scoped resource operations
//! - `db`: Connection pool and migrations
//! - `error`: Service error taxonomy

pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod store;

/// Current version of the TeamFlow shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
