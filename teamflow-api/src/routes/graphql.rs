/// GraphQL endpoint
///
/// `POST /graphql` executes a query with whatever identity the bearer token
/// resolves to. A missing or invalid token is not an error here; the request
/// runs anonymously and protected fields fail with `AUTHENTICATION_REQUIRED`.
///
/// `GET /graphql` serves GraphiQL.

use crate::{app::AppState, error::ApiResult};
use async_graphql::http::GraphiQLSource;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    response::Html,
    Json,
};

pub async fn graphql_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<async_graphql::Request>, JsonRejection>,
) -> ApiResult<Json<async_graphql::Response>> {
    let Json(request) = payload?;
    let identity = state.authenticator.resolve(&headers).await;

    Ok(Json(state.schema.execute(request.data(identity)).await))
}

pub async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}
