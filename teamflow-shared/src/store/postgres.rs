/// PostgreSQL backend
///
/// Thin adapter over the model SQL; unique violations become
/// [`StoreError::Duplicate`] on the way out.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{IdentityStore, ProjectStore, Store, StoreResult, TaskStore};
use crate::db::pool::health_check;
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::task::{CreateTask, Task, UpdateTask};
use crate::models::user::{CreateUser, User};

#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl IdentityStore for PgStore {
    async fn find_user_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> StoreResult<Option<User>> {
        Ok(User::find_by_email_or_username(&self.pool, email, username).await?)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(User::find_by_email(&self.pool, email).await?)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(User::find_by_id(&self.pool, id).await?)
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        Ok(User::create(&self.pool, data).await?)
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn list_projects(&self, owner: Uuid) -> StoreResult<Vec<Project>> {
        Ok(Project::list_by_owner(&self.pool, owner).await?)
    }

    async fn find_project(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Project>> {
        Ok(Project::find_owned(&self.pool, id, owner).await?)
    }

    async fn create_project(&self, owner: Uuid, data: CreateProject) -> StoreResult<Project> {
        Ok(Project::create(&self.pool, owner, data).await?)
    }

    async fn update_project(
        &self,
        id: Uuid,
        owner: Uuid,
        data: UpdateProject,
    ) -> StoreResult<Option<Project>> {
        Ok(Project::update_owned(&self.pool, id, owner, data).await?)
    }

    async fn delete_project(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        Ok(Project::delete_owned(&self.pool, id, owner).await?)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn list_tasks(&self, project_id: Uuid, owner: Uuid) -> StoreResult<Vec<Task>> {
        Ok(Task::list_by_project(&self.pool, project_id, owner).await?)
    }

    async fn find_task(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Task>> {
        Ok(Task::find_owned(&self.pool, id, owner).await?)
    }

    async fn create_task(&self, owner: Uuid, data: CreateTask) -> StoreResult<Option<Task>> {
        Ok(Task::create_in_owned_project(&self.pool, owner, data).await?)
    }

    async fn update_task(
        &self,
        id: Uuid,
        owner: Uuid,
        data: UpdateTask,
    ) -> StoreResult<Option<Task>> {
        Ok(Task::update_owned(&self.pool, id, owner, data).await?)
    }

    async fn delete_task(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        Ok(Task::delete_owned(&self.pool, id, owner).await?)
    }
}

#[async_trait]
impl Store for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(health_check(&self.pool).await?)
    }
}
