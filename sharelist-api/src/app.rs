/// Application state and router builder
///
/// Defines the shared application state and builds the Axum router with all
/// routes and middleware.
///
/// # Router layout
///
/// ```text
/// /
/// ├── /health                                # Health check (public)
/// └── /v1/
///     ├── /auth/                             # Public
///     │   ├── POST /register
///     │   ├── POST /login
///     │   └── POST /refresh
///     ├── /users/lookup                      # Authenticated directory query
///     └── /lists/                            # Authenticated
///         ├── GET    /                       # Merged owned + shared view
///         ├── POST   /                       # Create list with tasks
///         ├── GET    /stream                 # Live merged view (SSE)
///         ├── GET    /:id                    # Edit-form load
///         ├── PUT    /:id                    # Edit-form save
///         ├── DELETE /:id                    # Owner-only delete
///         ├── GET    /:id/tasks/stream       # Live task set (SSE)
///         ├── POST   /:id/tasks/:task_id/toggle
///         └── DELETE /:id/tasks/:task_id
/// ```

use crate::config::Config;
use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use sharelist_shared::auth::{identity::Identity, jwt};
use sharelist_shared::notify::ChangeHub;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned per request via Axum's `State` extractor; cheap because the inner
/// parts are pooled or Arc'd.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Change hub feeding the live subscriptions
    pub hub: ChangeHub,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            hub: ChangeHub::default(),
            config: Arc::new(config),
        }
    }

    /// Gets the JWT secret for token operations
    pub fn jwt_secret(&self) -> &str {
        &self.config.jwt.secret
    }
}

/// Builds the complete Axum router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    // Public: no session required
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/refresh", post(routes::auth::refresh));

    // Everything below requires an authenticated identity
    let user_routes = Router::new().route("/lookup", get(routes::users::lookup));

    let list_routes = Router::new()
        .route("/", get(routes::lists::list_lists))
        .route("/", post(routes::lists::create_list))
        .route("/stream", get(routes::stream::stream_lists))
        .route("/:id", get(routes::lists::get_list))
        .route("/:id", put(routes::lists::update_list))
        .route("/:id", delete(routes::lists::delete_list))
        .route("/:id/tasks/stream", get(routes::stream::stream_list_tasks))
        .route(
            "/:id/tasks/:task_id/toggle",
            post(routes::tasks::toggle_task),
        )
        .route("/:id/tasks/:task_id", delete(routes::tasks::delete_task));

    let protected = Router::new()
        .nest("/users", user_routes)
        .nest("/lists", list_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            jwt_auth_layer,
        ));

    let v1_routes = Router::new().nest("/auth", auth_routes).merge(protected);

    let cors = if state.config.api.cors_origins.contains(&"*".to_string()) {
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
            .allow_methods([
                Method::GET,
                Method::POST,
                Method::PUT,
                Method::DELETE,
                Method::OPTIONS,
            ])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
    };

    Router::new()
        .merge(health_routes)
        .nest("/v1", v1_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}

/// JWT authentication middleware layer
///
/// Extracts and validates the bearer token, then injects the authenticated
/// [`Identity`] into request extensions. Unauthenticated requests never
/// reach a handler.
async fn jwt_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, crate::error::ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| {
            crate::error::ApiError::Unauthorized("Missing authorization header".to_string())
        })?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| crate::error::ApiError::BadRequest("Expected Bearer token".to_string()))?;

    let claims = jwt::validate_access_token(token, state.jwt_secret())?;

    req.extensions_mut().insert(Identity::from_claims(&claims));

    Ok(next.run(req).await)
}
