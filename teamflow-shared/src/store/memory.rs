/// In-memory backend for tests and local demos
///
/// All state sits behind a single `tokio::sync::RwLock`, so a check and the
/// write that depends on it (email/username uniqueness, parent project
/// ownership) happen under one write guard, just like a single SQL statement.
/// Rows are kept in insertion order; lists walk them backwards to return
/// newest first.
///
/// # Example
///
/// ```
/// use teamflow_shared::models::user::CreateUser;
/// use teamflow_shared::store::memory::MemoryStore;
/// use teamflow_shared::store::IdentityStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryStore::new();
/// let user = store.create_user(CreateUser {
///     email: "alice@example.com".to_string(),
///     username: "alice".to_string(),
///     password_hash: "$argon2id$...".to_string(),
/// }).await?;
///
/// assert!(store.find_user_by_id(user.id).await?.is_some());
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    IdentityStore, ProjectStore, Store, StoreError, StoreResult, TaskStore, USERS_EMAIL_KEY,
    USERS_USERNAME_KEY,
};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::task::{CreateTask, Task, TaskStatus, UpdateTask};
use crate::models::user::{CreateUser, User};

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    projects: Vec<Project>,
    tasks: Vec<Task>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of task rows, across all owners
    pub async fn task_count(&self) -> usize {
        self.tables.read().await.tasks.len()
    }
}

#[async_trait]
impl IdentityStore for MemoryStore {
    async fn find_user_by_email_or_username(
        &self,
        email: &str,
        username: &str,
    ) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email == email || u.username == username)
            .cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_user(&self, data: CreateUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;

        for existing in &tables.users {
            let constraint = if existing.email == data.email {
                USERS_EMAIL_KEY
            } else if existing.username == data.username {
                USERS_USERNAME_KEY
            } else {
                continue;
            };
            return Err(StoreError::Duplicate {
                constraint: constraint.to_string(),
            });
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            email: data.email,
            username: data.username,
            password_hash: data.password_hash,
            created_at: now,
            updated_at: now,
        };
        tables.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ProjectStore for MemoryStore {
    async fn list_projects(&self, owner: Uuid) -> StoreResult<Vec<Project>> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .iter()
            .rev()
            .filter(|p| p.user_id == owner)
            .cloned()
            .collect())
    }

    async fn find_project(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Project>> {
        let tables = self.tables.read().await;
        Ok(tables
            .projects
            .iter()
            .find(|p| p.id == id && p.user_id == owner)
            .cloned())
    }

    async fn create_project(&self, owner: Uuid, data: CreateProject) -> StoreResult<Project> {
        let mut tables = self.tables.write().await;

        let now = Utc::now();
        let project = Project {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            user_id: owner,
            created_at: now,
            updated_at: now,
        };
        tables.projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: Uuid,
        owner: Uuid,
        data: UpdateProject,
    ) -> StoreResult<Option<Project>> {
        let mut tables = self.tables.write().await;

        let Some(project) = tables
            .projects
            .iter_mut()
            .find(|p| p.id == id && p.user_id == owner)
        else {
            return Ok(None);
        };

        if let Some(name) = data.name {
            project.name = name;
        }
        if let Some(description) = data.description {
            project.description = Some(description);
        }
        project.updated_at = Utc::now();

        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        let before = tables.projects.len();
        tables.projects.retain(|p| !(p.id == id && p.user_id == owner));
        if tables.projects.len() == before {
            return Ok(false);
        }

        tables.tasks.retain(|t| t.project_id != id);
        Ok(true)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(&self, project_id: Uuid, owner: Uuid) -> StoreResult<Vec<Task>> {
        let tables = self.tables.read().await;

        let owns_project = tables
            .projects
            .iter()
            .any(|p| p.id == project_id && p.user_id == owner);
        if !owns_project {
            return Ok(Vec::new());
        }

        Ok(tables
            .tasks
            .iter()
            .rev()
            .filter(|t| t.project_id == project_id && t.user_id == owner)
            .cloned()
            .collect())
    }

    async fn find_task(&self, id: Uuid, owner: Uuid) -> StoreResult<Option<Task>> {
        let tables = self.tables.read().await;
        Ok(tables
            .tasks
            .iter()
            .find(|t| t.id == id && t.user_id == owner)
            .cloned())
    }

    async fn create_task(&self, owner: Uuid, data: CreateTask) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;

        let owns_project = tables
            .projects
            .iter()
            .any(|p| p.id == data.project_id && p.user_id == owner);
        if !owns_project {
            return Ok(None);
        }

        let now = Utc::now();
        let task = Task {
            id: Uuid::new_v4(),
            title: data.title,
            description: data.description,
            status: TaskStatus::Backlog,
            project_id: data.project_id,
            user_id: owner,
            created_at: now,
            updated_at: now,
        };
        tables.tasks.push(task.clone());
        Ok(Some(task))
    }

    async fn update_task(
        &self,
        id: Uuid,
        owner: Uuid,
        data: UpdateTask,
    ) -> StoreResult<Option<Task>> {
        let mut tables = self.tables.write().await;

        let Some(task) = tables
            .tasks
            .iter_mut()
            .find(|t| t.id == id && t.user_id == owner)
        else {
            return Ok(None);
        };

        if let Some(title) = data.title {
            task.title = title;
        }
        if let Some(description) = data.description {
            task.description = Some(description);
        }
        if let Some(status) = data.status {
            task.status = status;
        }
        task.updated_at = Utc::now();

        Ok(Some(task.clone()))
    }

    async fn delete_task(&self, id: Uuid, owner: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;

        let before = tables.tasks.len();
        tables.tasks.retain(|t| !(t.id == id && t.user_id == owner));
        Ok(tables.tasks.len() < before)
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
