/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Registration, login and the current user
/// - `graphql`: GraphQL endpoint and GraphiQL page

pub mod auth;
pub mod graphql;
pub mod health;
