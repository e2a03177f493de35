/// GraphQL schema for projects and tasks
///
/// The schema holds [`Services`] as global data. The request handler attaches
/// the caller's [`RequestIdentity`] as per-request data; resolvers pass it to
/// the services, which reject anonymous callers themselves.
///
/// Errors carry `extensions.code` with the service error code, plus
/// `extensions.details` for validation failures.

use async_graphql::{Context, EmptySubscription, ErrorExtensions, Schema, Value};
use teamflow_shared::auth::identity::RequestIdentity;
use teamflow_shared::error::{ErrorKind, ServiceError, ServiceResult};
use teamflow_shared::services::Services;

pub mod mutation;
pub mod query;
pub mod types;

pub use mutation::MutationRoot;
pub use query::QueryRoot;

pub type TeamflowSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Used when a request carries no identity data at all
static ANONYMOUS: RequestIdentity = RequestIdentity::Anonymous;

pub fn build_schema(services: Services) -> TeamflowSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(services)
        .finish()
}

pub(crate) fn services<'ctx>(ctx: &Context<'ctx>) -> async_graphql::Result<&'ctx Services> {
    ctx.data::<Services>()
}

pub(crate) fn identity<'ctx>(ctx: &Context<'ctx>) -> &'ctx RequestIdentity {
    ctx.data_opt::<RequestIdentity>().unwrap_or(&ANONYMOUS)
}

/// Converts a service error into a GraphQL error with a stable code
pub(crate) fn to_graphql_error(err: ServiceError) -> async_graphql::Error {
    let kind = err.kind();
    let message = if kind == ErrorKind::Internal {
        tracing::error!(error = %err, "GraphQL resolver failed");
        "An internal error occurred".to_string()
    } else {
        err.to_string()
    };

    let details = err
        .violations()
        .and_then(|violations| serde_json::to_value(violations).ok())
        .and_then(|json| Value::from_json(json).ok());

    async_graphql::Error::new(message).extend_with(|_, extensions| {
        extensions.set("code", kind.code().to_string());
        if let Some(details) = details {
            extensions.set("details", details);
        }
    })
}

pub(crate) trait ServiceResultExt<T> {
    /// Maps the error side for resolvers
    fn gql(self) -> async_graphql::Result<T>;
}

impl<T> ServiceResultExt<T> for ServiceResult<T> {
    fn gql(self) -> async_graphql::Result<T> {
        self.map_err(to_graphql_error)
    }
}
