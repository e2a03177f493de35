/// Write operations

use async_graphql::{Context, Object, Result, ID};

use super::types::{
    CreateProjectInput, CreateTaskInput, ProjectNode, TaskNode, UpdateProjectInput,
    UpdateTaskInput,
};
use super::{identity, services, ServiceResultExt};

#[derive(Default)]
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    async fn create_project(
        &self,
        ctx: &Context<'_>,
        input: CreateProjectInput,
    ) -> Result<ProjectNode> {
        let project = services(ctx)?
            .projects
            .create(identity(ctx), input.into())
            .await
            .gql()?;
        Ok(project.into())
    }

    /// Changes only the fields that are provided
    async fn update_project(
        &self,
        ctx: &Context<'_>,
        input: UpdateProjectInput,
    ) -> Result<ProjectNode> {
        let project = services(ctx)?
            .projects
            .update(identity(ctx), input.into())
            .await
            .gql()?;
        Ok(project.into())
    }

    /// Deletes the project together with its tasks
    async fn delete_project(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        services(ctx)?.projects.delete(identity(ctx), &id).await.gql()
    }

    /// New tasks start in `BACKLOG`
    async fn create_task(&self, ctx: &Context<'_>, input: CreateTaskInput) -> Result<TaskNode> {
        let task = services(ctx)?
            .tasks
            .create(identity(ctx), input.into())
            .await
            .gql()?;
        Ok(task.into())
    }

    /// Any status may be set from any other status
    async fn update_task(&self, ctx: &Context<'_>, input: UpdateTaskInput) -> Result<TaskNode> {
        let task = services(ctx)?
            .tasks
            .update(identity(ctx), input.into())
            .await
            .gql()?;
        Ok(task.into())
    }

    async fn delete_task(&self, ctx: &Context<'_>, id: ID) -> Result<bool> {
        services(ctx)?.tasks.delete(identity(ctx), &id).await.gql()
    }
}
