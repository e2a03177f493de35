/// Read operations
///
/// Every field requires an authenticated caller and only ever returns the
/// caller's own data.

use async_graphql::{Context, Object, Result, ID};

use super::types::{ProjectNode, TaskNode};
use super::{identity, services, ServiceResultExt};

#[derive(Default)]
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The caller's projects, newest first
    async fn projects(&self, ctx: &Context<'_>) -> Result<Vec<ProjectNode>> {
        let projects = services(ctx)?.projects.list(identity(ctx)).await.gql()?;
        Ok(projects.into_iter().map(ProjectNode::from).collect())
    }

    /// A missing or foreign project is a `NOT_FOUND` error, never `null`
    async fn project(&self, ctx: &Context<'_>, id: ID) -> Result<Option<ProjectNode>> {
        let project = services(ctx)?.projects.get(identity(ctx), &id).await.gql()?;
        Ok(Some(project.into()))
    }

    /// Tasks on one of the caller's projects
    async fn tasks(&self, ctx: &Context<'_>, project_id: ID) -> Result<Vec<TaskNode>> {
        let tasks = services(ctx)?
            .tasks
            .list(identity(ctx), &project_id)
            .await
            .gql()?;
        Ok(tasks.into_iter().map(TaskNode::from).collect())
    }

    /// A missing or foreign task is a `NOT_FOUND` error, never `null`
    async fn task(&self, ctx: &Context<'_>, id: ID) -> Result<Option<TaskNode>> {
        let task = services(ctx)?.tasks.get(identity(ctx), &id).await.gql()?;
        Ok(Some(task.into()))
    }
}
