use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::create_post::create_post;
use super::handlers::create_user::create_user;
use super::handlers::delete_post::delete_post;
use super::handlers::delete_user::delete_user;
use super::handlers::get_post::get_post;
use super::handlers::get_user::get_user;
use super::handlers::list_posts::list_posts;
use super::handlers::list_users::list_users;
use super::handlers::login::login;
use super::handlers::update_post::update_post;
use super::handlers::update_user::update_user;
use super::middleware::authenticate as auth_middleware;
use crate::domain::auth::service::AuthService;
use crate::domain::post::ports::PostRepository;
use crate::domain::post::service::PostService;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::service::UserService;

/// Shared handler state, generic over the storage adapters so the test suite
/// can run the full HTTP surface against an in-memory store.
pub struct AppState<UR, PR>
where
    UR: UserRepository,
    PR: PostRepository,
{
    pub user_service: Arc<UserService<UR>>,
    pub post_service: Arc<PostService<PR, UR>>,
    pub auth_service: Arc<AuthService<UR>>,
    pub authenticator: Arc<Authenticator>,
}

impl<UR, PR> Clone for AppState<UR, PR>
where
    UR: UserRepository,
    PR: PostRepository,
{
    fn clone(&self) -> Self {
        Self {
            user_service: Arc::clone(&self.user_service),
            post_service: Arc::clone(&self.post_service),
            auth_service: Arc::clone(&self.auth_service),
            authenticator: Arc::clone(&self.authenticator),
        }
    }
}

pub fn create_router<UR, PR>(
    user_repository: Arc<UR>,
    post_repository: Arc<PR>,
    authenticator: Arc<Authenticator>,
) -> Router
where
    UR: UserRepository,
    PR: PostRepository,
{
    let state = AppState {
        user_service: Arc::new(UserService::new(Arc::clone(&user_repository))),
        post_service: Arc::new(PostService::new(post_repository, Arc::clone(&user_repository))),
        auth_service: Arc::new(AuthService::new(
            user_repository,
            Arc::clone(&authenticator),
        )),
        authenticator,
    };

    let public_routes = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/posts", get(list_posts))
        .route("/api/posts", post(create_post))
        .route("/api/posts/:post_id", get(get_post))
        .route("/api/posts/:post_id", patch(update_post))
        .route("/api/posts/:post_id", delete(delete_post));

    // The guard runs before any user handler; an absent or invalid token is
    // rejected here.
    let protected_routes = Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users", post(create_user))
        .route("/api/users/:user_id", get(get_user))
        .route("/api/users/:user_id", patch(update_user))
        .route("/api/users/:user_id", delete(delete_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::<UR, PR>,
        ));

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
