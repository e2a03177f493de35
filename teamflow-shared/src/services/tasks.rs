/// Owner-scoped task operations
///
/// Operations that name a project check that the caller owns it first. A
/// task's status can be set to any value at any time.

use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use super::parse_id;
use crate::auth::identity::RequestIdentity;
use crate::error::{ServiceError, ServiceResult};
use crate::models::task::{CreateTask, Task, TaskStatus, UpdateTask};
use crate::store::{ProjectStore, TaskStore};

const TASK: &str = "Task";
const PROJECT: &str = "Project";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTaskInput {
    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: String,

    pub description: Option<String>,

    pub project_id: String,
}

/// Only the provided fields change
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTaskInput {
    pub id: String,

    #[validate(length(min = 1, max = 255, message = "Title must be between 1 and 255 characters"))]
    pub title: Option<String>,

    pub description: Option<String>,

    pub status: Option<TaskStatus>,
}

#[derive(Clone)]
pub struct TaskService {
    projects: Arc<dyn ProjectStore>,
    tasks: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(projects: Arc<dyn ProjectStore>, tasks: Arc<dyn TaskStore>) -> Self {
        Self { projects, tasks }
    }

    /// Tasks on one of the caller's projects, newest first
    pub async fn list(&self, identity: &RequestIdentity, project_id: &str) -> ServiceResult<Vec<Task>> {
        let user = identity.require()?;
        let project_id = parse_id(project_id, PROJECT)?;

        if self.projects.find_project(project_id, user.id).await?.is_none() {
            return Err(ServiceError::NotFound(PROJECT));
        }

        Ok(self.tasks.list_tasks(project_id, user.id).await?)
    }

    pub async fn get(&self, identity: &RequestIdentity, id: &str) -> ServiceResult<Task> {
        let user = identity.require()?;
        let id = parse_id(id, TASK)?;

        self.tasks
            .find_task(id, user.id)
            .await?
            .ok_or(ServiceError::NotFound(TASK))
    }

    /// Adds a `BACKLOG` task to one of the caller's projects
    ///
    /// A project the caller does not own is `NotFound` and nothing is written.
    pub async fn create(
        &self,
        identity: &RequestIdentity,
        input: CreateTaskInput,
    ) -> ServiceResult<Task> {
        let user = identity.require()?;
        let project_id = parse_id(&input.project_id, PROJECT)?;
        let input = CreateTaskInput {
            title: input.title.trim().to_string(),
            ..input
        };
        input.validate()?;

        let task = self
            .tasks
            .create_task(
                user.id,
                CreateTask {
                    title: input.title,
                    description: input.description,
                    project_id,
                },
            )
            .await?
            .ok_or(ServiceError::NotFound(PROJECT))?;

        info!(task_id = %task.id, project_id = %project_id, user_id = %user.id, "Task created");
        Ok(task)
    }

    pub async fn update(
        &self,
        identity: &RequestIdentity,
        input: UpdateTaskInput,
    ) -> ServiceResult<Task> {
        let user = identity.require()?;
        let id = parse_id(&input.id, TASK)?;
        let input = UpdateTaskInput {
            title: input.title.map(|t| t.trim().to_string()),
            ..input
        };
        input.validate()?;

        let task = self
            .tasks
            .update_task(
                id,
                user.id,
                UpdateTask {
                    title: input.title,
                    description: input.description,
                    status: input.status,
                },
            )
            .await?
            .ok_or(ServiceError::NotFound(TASK))?;

        if let Some(status) = input.status {
            info!(task_id = %task.id, status = %status, "Task status changed");
        }
        Ok(task)
    }

    pub async fn delete(&self, identity: &RequestIdentity, id: &str) -> ServiceResult<bool> {
        let user = identity.require()?;
        let id = parse_id(id, TASK)?;

        if !self.tasks.delete_task(id, user.id).await? {
            return Err(ServiceError::NotFound(TASK));
        }

        info!(task_id = %id, user_id = %user.id, "Task deleted");
        Ok(true)
    }
}
