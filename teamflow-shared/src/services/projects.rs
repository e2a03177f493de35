/// Owner-scoped project operations
///
/// Ids arrive as client strings. Anything the caller cannot see, whether it
/// is missing, owned by another user, or not even a UUID, fails with
/// `NotFound("Project")`.

use serde::Deserialize;
use std::sync::Arc;
use tracing::info;
use validator::Validate;

use super::parse_id;
use crate::auth::identity::RequestIdentity;
use crate::error::{ServiceError, ServiceResult};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::store::ProjectStore;

const PROJECT: &str = "Project";

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProjectInput {
    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: String,

    pub description: Option<String>,
}

/// Only the provided fields change
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProjectInput {
    pub id: String,

    #[validate(length(min = 1, max = 255, message = "Name must be between 1 and 255 characters"))]
    pub name: Option<String>,

    pub description: Option<String>,
}

#[derive(Clone)]
pub struct ProjectService {
    projects: Arc<dyn ProjectStore>,
}

impl ProjectService {
    pub fn new(projects: Arc<dyn ProjectStore>) -> Self {
        Self { projects }
    }

    /// The caller's projects, newest first
    pub async fn list(&self, identity: &RequestIdentity) -> ServiceResult<Vec<Project>> {
        let user = identity.require()?;
        Ok(self.projects.list_projects(user.id).await?)
    }

    pub async fn get(&self, identity: &RequestIdentity, id: &str) -> ServiceResult<Project> {
        let user = identity.require()?;
        let id = parse_id(id, PROJECT)?;

        self.projects
            .find_project(id, user.id)
            .await?
            .ok_or(ServiceError::NotFound(PROJECT))
    }

    pub async fn create(
        &self,
        identity: &RequestIdentity,
        input: CreateProjectInput,
    ) -> ServiceResult<Project> {
        let user = identity.require()?;
        let input = CreateProjectInput {
            name: input.name.trim().to_string(),
            ..input
        };
        input.validate()?;

        let project = self
            .projects
            .create_project(
                user.id,
                CreateProject {
                    name: input.name,
                    description: input.description,
                },
            )
            .await?;

        info!(project_id = %project.id, user_id = %user.id, "Project created");
        Ok(project)
    }

    pub async fn update(
        &self,
        identity: &RequestIdentity,
        input: UpdateProjectInput,
    ) -> ServiceResult<Project> {
        let user = identity.require()?;
        let id = parse_id(&input.id, PROJECT)?;
        let input = UpdateProjectInput {
            name: input.name.map(|n| n.trim().to_string()),
            ..input
        };
        input.validate()?;

        self.projects
            .update_project(
                id,
                user.id,
                UpdateProject {
                    name: input.name,
                    description: input.description,
                },
            )
            .await?
            .ok_or(ServiceError::NotFound(PROJECT))
    }

    /// Deletes the project and its tasks
    ///
    /// Returns `true`; a project that is already gone is `NotFound`.
    pub async fn delete(&self, identity: &RequestIdentity, id: &str) -> ServiceResult<bool> {
        let user = identity.require()?;
        let id = parse_id(id, PROJECT)?;

        if !self.projects.delete_project(id, user.id).await? {
            return Err(ServiceError::NotFound(PROJECT));
        }

        info!(project_id = %id, user_id = %user.id, "Project deleted");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::identity::CurrentUser;
    use crate::error::ErrorKind;
    use crate::store::memory::MemoryStore;
    use chrono::Utc;
    use uuid::Uuid;

    fn identity(username: &str) -> RequestIdentity {
        RequestIdentity::Authenticated(CurrentUser {
            id: Uuid::new_v4(),
            email: format!("{}@example.com", username),
            username: username.to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    fn named(name: &str) -> CreateProjectInput {
        CreateProjectInput {
            name: name.to_string(),
            description: None,
        }
    }

    fn service() -> ProjectService {
        ProjectService::new(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_anonymous_is_rejected_everywhere() {
        let projects = service();
        let anon = RequestIdentity::Anonymous;
        let id = Uuid::new_v4().to_string();

        assert_eq!(
            projects.list(&anon).await.unwrap_err().kind(),
            ErrorKind::AuthenticationRequired
        );
        assert_eq!(
            projects.get(&anon, &id).await.unwrap_err().kind(),
            ErrorKind::AuthenticationRequired
        );
        assert_eq!(
            projects.create(&anon, named("x")).await.unwrap_err().kind(),
            ErrorKind::AuthenticationRequired
        );
        assert_eq!(
            projects.delete(&anon, &id).await.unwrap_err().kind(),
            ErrorKind::AuthenticationRequired
        );
    }

    #[tokio::test]
    async fn test_other_users_projects_are_not_found() {
        let projects = service();
        let alice = identity("alice");
        let bob = identity("bob");

        let project = projects.create(&alice, named("Secret")).await.unwrap();
        let id = project.id.to_string();

        assert_eq!(projects.get(&bob, &id).await.unwrap_err().kind(), ErrorKind::NotFound);
        assert!(projects.list(&bob).await.unwrap().is_empty());

        let update = UpdateProjectInput {
            id: id.clone(),
            name: Some("Mine now".to_string()),
            description: None,
        };
        assert_eq!(projects.update(&bob, update).await.unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(projects.delete(&bob, &id).await.unwrap_err().kind(), ErrorKind::NotFound);

        assert_eq!(projects.get(&alice, &id).await.unwrap().name, "Secret");
    }

    #[tokio::test]
    async fn test_partial_update() {
        let projects = service();
        let alice = identity("alice");
        let project = projects
            .create(
                &alice,
                CreateProjectInput {
                    name: "Site".to_string(),
                    description: Some("Relaunch".to_string()),
                },
            )
            .await
            .unwrap();

        let updated = projects
            .update(
                &alice,
                UpdateProjectInput {
                    id: project.id.to_string(),
                    name: Some("Website".to_string()),
                    description: None,
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.name, "Website");
        assert_eq!(updated.description.as_deref(), Some("Relaunch"));
        assert!(updated.updated_at >= project.updated_at);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let projects = service();
        let alice = identity("alice");
        let id = projects.create(&alice, named("Temp")).await.unwrap().id.to_string();

        assert!(projects.delete(&alice, &id).await.unwrap());
        assert_eq!(projects.get(&alice, &id).await.unwrap_err().kind(), ErrorKind::NotFound);
        assert_eq!(projects.delete(&alice, &id).await.unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_blank_name_and_bad_id() {
        let projects = service();
        let alice = identity("alice");

        assert_eq!(
            projects.create(&alice, named("   ")).await.unwrap_err().kind(),
            ErrorKind::Validation
        );
        assert_eq!(
            projects.get(&alice, "42").await.unwrap_err().kind(),
            ErrorKind::NotFound
        );
    }
}
