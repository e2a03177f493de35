//! # TeamFlow API Server Library
//!
//! HTTP surface of TeamFlow: REST authentication routes and a GraphQL
//! endpoint for projects and tasks, served by axum.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `graphql`: Schema, object types and resolvers
//! - `routes`: Route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod graphql;
pub mod routes;
