/// Request-scoped identity
///
/// Every request carries exactly one [`RequestIdentity`]: either the user the
/// bearer token resolved to, or an explicit anonymous marker. Protected
/// operations call [`RequestIdentity::require`] once instead of re-checking
/// optional fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ServiceError;
use crate::models::user::User;

/// Public projection of a user, safe to return to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            username: user.username,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Who is making the current request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestIdentity {
    Authenticated(CurrentUser),
    Anonymous,
}

impl RequestIdentity {
    /// The authenticated user, or `AuthenticationRequired`
    pub fn require(&self) -> Result<&CurrentUser, ServiceError> {
        match self {
            RequestIdentity::Authenticated(user) => Ok(user),
            RequestIdentity::Anonymous => Err(ServiceError::AuthenticationRequired),
        }
    }

    pub fn user(&self) -> Option<&CurrentUser> {
        match self {
            RequestIdentity::Authenticated(user) => Some(user),
            RequestIdentity::Anonymous => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, RequestIdentity::Anonymous)
    }
}

impl From<CurrentUser> for RequestIdentity {
    fn from(user: CurrentUser) -> Self {
        RequestIdentity::Authenticated(user)
    }
}
