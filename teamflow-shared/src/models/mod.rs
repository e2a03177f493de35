/// Database models for TeamFlow
///
/// Each model owns the SQL for its table. Statements touching projects and
/// tasks always take the owner's id and filter on it.
///
/// # Models
///
/// - `user`: Registered accounts
/// - `project`: Owner-scoped projects
/// - `task`: Owner-scoped tasks on a project's board
///
/// # Example
///
/// ```no_run
/// use teamflow_shared::models::project::{Project, CreateProject};
/// use teamflow_shared::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example(owner: Uuid) -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let project = Project::create(&pool, owner, CreateProject {
///     name: "Website relaunch".to_string(),
///     description: None,
/// }).await?;
///
/// let mine = Project::list_by_owner(&pool, owner).await?;
/// assert!(mine.iter().any(|p| p.id == project.id));
/// # Ok(())
/// # }
/// ```

pub mod project;
pub mod task;
pub mod user;
