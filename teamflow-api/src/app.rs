/// Application state and router builder
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use teamflow_api::{app::{build_router, AppState}, config::Config};
/// use teamflow_shared::db::pool::{create_pool, DatabaseConfig};
/// use teamflow_shared::store::postgres::PgStore;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(DatabaseConfig {
///     url: config.database.url.clone(),
///     ..Default::default()
/// }).await?;
///
/// let state = AppState::new(Arc::new(PgStore::new(pool)), config);
/// let app = build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use crate::error::ApiError;
use crate::graphql::{build_schema, TeamflowSchema};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use teamflow_shared::auth::jwt::TokenIssuer;
use teamflow_shared::auth::middleware::Authenticator;
use teamflow_shared::auth::password::CredentialHasher;
use teamflow_shared::services::Services;
use teamflow_shared::store::Store;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via Axum's `State` extractor; every field
/// is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    pub authenticator: Authenticator,
    pub store: Arc<dyn Store>,
    pub schema: TeamflowSchema,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires token issuer, hasher, services and schema over `store`
    pub fn new<S: Store + 'static>(store: Arc<S>, config: Config) -> Self {
        let tokens = Arc::new(TokenIssuer::new(&config.jwt.secret, config.jwt.expires_in));
        let hasher = CredentialHasher::new(config.password);

        let services = Services::new(store.clone(), tokens.clone(), hasher);
        let authenticator = Authenticator::new(tokens, services.auth.clone());
        let schema = build_schema(services.clone());

        Self {
            services,
            authenticator,
            store,
            schema,
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// ```text
/// /
/// ├── GET  /health          # Health check (public)
/// ├── /auth/
/// │   ├── POST /register    # public
/// │   ├── POST /login       # public
/// │   └── GET  /me          # bearer token required
/// └── /graphql
///     ├── POST              # queries and mutations, identity optional
///     └── GET               # GraphiQL
/// ```
///
/// Middleware, outermost first: CORS, request tracing, then per-route
/// authentication on `/auth/me`.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let auth_routes = Router::new()
        .route(
            "/me",
            get(routes::auth::me).route_layer(axum::middleware::from_fn_with_state(
                state.clone(),
                require_auth,
            )),
        )
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login));

    let graphql_routes = Router::new().route(
        "/graphql",
        get(routes::graphql::graphiql).post(routes::graphql::graphql_handler),
    );

    let cors = if state.config.api.cors_origins.iter().any(|o| o == "*") {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .merge(health_routes)
        .nest("/auth", auth_routes)
        .merge(graphql_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// Strict authentication layer
///
/// Resolves the bearer token to a user and stores the
/// [`CurrentUser`](teamflow_shared::auth::identity::CurrentUser) in request
/// extensions; responds 401 otherwise.
async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = state.authenticator.require(req.headers()).await?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
