/// GraphQL object and input types
///
/// Ids are exposed as `ID`, timestamps as ISO-8601 strings with millisecond
/// precision.

use async_graphql::{ComplexObject, Context, Enum, InputObject, Result, SimpleObject, ID};
use chrono::{DateTime, SecondsFormat, Utc};
use teamflow_shared::models::project::Project;
use teamflow_shared::models::task::{Task, TaskStatus};
use teamflow_shared::services::{projects, tasks};

use super::{identity, services, ServiceResultExt};

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[derive(Enum, Debug, Copy, Clone, PartialEq, Eq)]
#[graphql(name = "TaskStatus")]
pub enum TaskStatusValue {
    Backlog,
    Selected,
    InProgress,
    Done,
}

impl From<TaskStatus> for TaskStatusValue {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Backlog => TaskStatusValue::Backlog,
            TaskStatus::Selected => TaskStatusValue::Selected,
            TaskStatus::InProgress => TaskStatusValue::InProgress,
            TaskStatus::Done => TaskStatusValue::Done,
        }
    }
}

impl From<TaskStatusValue> for TaskStatus {
    fn from(status: TaskStatusValue) -> Self {
        match status {
            TaskStatusValue::Backlog => TaskStatus::Backlog,
            TaskStatusValue::Selected => TaskStatus::Selected,
            TaskStatusValue::InProgress => TaskStatus::InProgress,
            TaskStatusValue::Done => TaskStatus::Done,
        }
    }
}

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Project", complex)]
pub struct ProjectNode {
    pub id: ID,
    pub name: String,
    pub description: Option<String>,
    pub user_id: String,
    pub created_at: String,
    pub updated_at: String,
}

#[ComplexObject]
impl ProjectNode {
    /// Tasks on this project, newest first
    async fn tasks(&self, ctx: &Context<'_>) -> Result<Vec<TaskNode>> {
        let tasks = services(ctx)?
            .tasks
            .list(identity(ctx), &self.id)
            .await
            .gql()?;
        Ok(tasks.into_iter().map(TaskNode::from).collect())
    }
}

impl From<Project> for ProjectNode {
    fn from(project: Project) -> Self {
        Self {
            id: ID::from(project.id.to_string()),
            name: project.name,
            description: project.description,
            user_id: project.user_id.to_string(),
            created_at: timestamp(project.created_at),
            updated_at: timestamp(project.updated_at),
        }
    }
}

#[derive(SimpleObject, Debug, Clone)]
#[graphql(name = "Task")]
pub struct TaskNode {
    pub id: ID,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatusValue,
    pub user_id: String,
    pub project_id: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Task> for TaskNode {
    fn from(task: Task) -> Self {
        Self {
            id: ID::from(task.id.to_string()),
            title: task.title,
            description: task.description,
            status: task.status.into(),
            user_id: task.user_id.to_string(),
            project_id: task.project_id.to_string(),
            created_at: timestamp(task.created_at),
            updated_at: timestamp(task.updated_at),
        }
    }
}

#[derive(InputObject, Debug)]
pub struct CreateProjectInput {
    pub name: String,
    pub description: Option<String>,
}

impl From<CreateProjectInput> for projects::CreateProjectInput {
    fn from(input: CreateProjectInput) -> Self {
        Self {
            name: input.name,
            description: input.description,
        }
    }
}

#[derive(InputObject, Debug)]
pub struct UpdateProjectInput {
    pub id: ID,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl From<UpdateProjectInput> for projects::UpdateProjectInput {
    fn from(input: UpdateProjectInput) -> Self {
        Self {
            id: input.id.to_string(),
            name: input.name,
            description: input.description,
        }
    }
}

#[derive(InputObject, Debug)]
pub struct CreateTaskInput {
    pub title: String,
    pub description: Option<String>,
    pub project_id: ID,
}

impl From<CreateTaskInput> for tasks::CreateTaskInput {
    fn from(input: CreateTaskInput) -> Self {
        Self {
            title: input.title,
            description: input.description,
            project_id: input.project_id.to_string(),
        }
    }
}

#[derive(InputObject, Debug)]
pub struct UpdateTaskInput {
    pub id: ID,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatusValue>,
}

impl From<UpdateTaskInput> for tasks::UpdateTaskInput {
    fn from(input: UpdateTaskInput) -> Self {
        Self {
            id: input.id.to_string(),
            title: input.title,
            description: input.description,
            status: input.status.map(TaskStatus::from),
        }
    }
}
