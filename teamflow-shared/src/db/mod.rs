/// PostgreSQL connection management
///
/// - [`pool`]: Connection pool creation and health checks
/// - [`migrations`]: Embedded schema migrations

pub mod migrations;
pub mod pool;
