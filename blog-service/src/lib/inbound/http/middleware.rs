use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::post::ports::PostRepository;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::inbound::http::router::AppState;

/// Identity attached to the request after the guard accepts its token.
///
/// Downstream extensions (role checks and the like) read from here.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: UserId,
    pub email: String,
}

/// Route guard: validates the bearer token and attaches the decoded identity
/// to the request extensions. Rejects with 401 before any handler runs.
pub async fn authenticate<UR, PR>(
    State(state): State<AppState<UR, PR>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response>
where
    UR: UserRepository,
    PR: PostRepository,
{
    let token = extract_token_from_header(&req)?;

    let claims: auth::Claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Token validation failed");
        unauthorized("Invalid or expired token")
    })?;

    let user_id_str = claims.sub.as_ref().ok_or_else(|| {
        tracing::warn!("Missing 'sub' claim in token");
        unauthorized("Invalid token format")
    })?;

    let user_id = UserId::from_string(user_id_str).map_err(|e| {
        tracing::warn!(error = %e, "Failed to parse user ID from token");
        unauthorized("Invalid token format")
    })?;

    let email = claims.email().unwrap_or_default();

    req.extensions_mut()
        .insert(AuthenticatedUser { user_id, email });

    Ok(next.run(req).await)
}

fn extract_token_from_header(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    auth_str
        .strip_prefix("Bearer ")
        .ok_or_else(|| unauthorized("Invalid Authorization header format. Expected: Bearer <token>"))
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": message
        })),
    )
        .into_response()
}
