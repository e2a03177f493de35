/// Business operations
///
/// - [`auth::AuthService`]: registration, login, identity lookup
/// - [`projects::ProjectService`]: owner-scoped project CRUD
/// - [`tasks::TaskService`]: owner-scoped task CRUD
///
/// Resource services take the caller's [`RequestIdentity`] on every call and
/// refuse anonymous callers before touching storage.
///
/// [`RequestIdentity`]: crate::auth::identity::RequestIdentity

use std::sync::Arc;
use uuid::Uuid;

use crate::auth::jwt::TokenIssuer;
use crate::auth::password::CredentialHasher;
use crate::error::{FieldViolation, ServiceError, ServiceResult};
use crate::store::Store;

pub mod auth;
pub mod projects;
pub mod tasks;

pub use auth::AuthService;
pub use projects::ProjectService;
pub use tasks::TaskService;

/// All services over one backend
#[derive(Clone)]
pub struct Services {
    pub auth: AuthService,
    pub projects: ProjectService,
    pub tasks: TaskService,
}

impl Services {
    pub fn new<S: Store + 'static>(
        store: Arc<S>,
        tokens: Arc<TokenIssuer>,
        hasher: CredentialHasher,
    ) -> Self {
        Self {
            auth: AuthService::new(store.clone(), tokens, hasher),
            projects: ProjectService::new(store.clone()),
            tasks: TaskService::new(store.clone(), store),
        }
    }
}

/// Parses a client-supplied id; anything that is not a UUID cannot exist
pub(crate) fn parse_id(raw: &str, resource: &'static str) -> ServiceResult<Uuid> {
    Uuid::parse_str(raw.trim()).map_err(|_| ServiceError::NotFound(resource))
}

/// Rejects blank required fields, reporting all of them at once
pub(crate) fn require_present(fields: &[(&str, &str)]) -> ServiceResult<()> {
    let violations: Vec<FieldViolation> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| FieldViolation::new(*field, format!("{} is required", field)))
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ServiceError::Validation(violations))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string(), "Project").unwrap(), id);

        let err = parse_id("not-a-uuid", "Project").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.to_string(), "Project not found");
    }

    #[test]
    fn test_require_present_collects_all_blanks() {
        assert!(require_present(&[("email", "a@b.c"), ("password", "x")]).is_ok());

        let err = require_present(&[("email", " "), ("username", "bob"), ("password", "")])
            .unwrap_err();
        let fields: Vec<&str> = err
            .violations()
            .unwrap()
            .iter()
            .map(|v| v.field.as_str())
            .collect();
        assert_eq!(fields, vec!["email", "password"]);
    }
}
