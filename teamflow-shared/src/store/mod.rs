/// Storage traits
///
/// Services depend on these traits rather than on `PgPool`, so the same
/// business logic runs over PostgreSQL in production and over an in-memory
/// store in tests.
///
/// Every project and task operation takes the owner's id. Implementations must
/// apply the owner filter inside the same atomic step as the read or write;
/// a row owned by someone else is reported exactly like a missing row.
///
/// # Backends
///
/// - [`postgres::PgStore`]: delegates to the SQL in [`crate::models`]
/// - [`memory::MemoryStore`]: `tokio::sync::RwLock` over plain vectors

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::models::user::{CreateUser, User};

pub mod memory;
pub mod postgres;

/// Unique constraint on `users.email`
pub const USERS_EMAIL_KEY: &str = "users_email_key";

/// Unique constraint on `users.username`
pub const USERS_USERNAME_KEY: &str = "users_username_key";

pub type StoreResult<T> = Result<T, StoreError>;

/// Storage failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A uniqueness constraint rejected the write
    #[error("Unique constraint violated: {constraint}")]
    Duplicate { constraint: String },

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.code().is_some_and(|code| code.as_ref() == "23505") {
                return StoreError::Duplicate {
                    constraint: db_err.constraint().unwrap_or("unknown").to_string(),
                };
            }
        }
        StoreError::Database(err)
    }
}

/// User records
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn find_user_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    /// Fails with [`StoreError::Duplicate`] if email or username is taken
    async fn create_user(&self, data: CreateUser) -> StoreResult<User>;
}

/// Projects, always scoped to an owner
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Newest first
    async fn list_projects(&self, owner: Uuid) -> StoreResult<Vec<Project>>;

    async fn find_project(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Project>>;

    async fn create_project(&self, owner: Uuid, data: CreateProject) -> StoreResult<Project>;

    async fn update_project(
        &self,
        id: Uuid,
        owner: Uuid,
        data: UpdateProject,
    ) -> StoreResult<Option<Project>>;

    /// Removes the project and its tasks; false if nothing matched
    async fn delete_project(&self, id: Uuid, owner: Uuid) -> StoreResult<bool>;
}

/// Tasks, always scoped to an owner
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Empty when the project is not owned by `owner`
    async fn list_tasks(&self, project_id: Uuid, owner: Uuid) -> StoreResult<Vec<Task>>;

    async fn find_task(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Task>>;

    /// `None` when the target project is not owned by `owner`
    async fn create_task(&self, owner: Uuid, data: CreateTask) -> StoreResult<Option<Task>>;

    async fn update_task(&self, id: Uuid, owner: Uuid, data: UpdateTask)
        -> StoreResult<Option<Task>>;

    async fn delete_task(&self, id: Uuid, owner: Uuid) -> StoreResult<bool>;
}

/// A complete backend
#[async_trait]
pub trait Store: IdentityStore + ProjectStore + TaskStore {
    /// Short name for health reporting
    fn backend(&self) -> &'static str;

    /// Checks that the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}
