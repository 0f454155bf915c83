use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::CookieJar;

use crate::auth::{verify_token, SESSION_COOKIE};
use crate::error::AppError;
use crate::models::User;
use crate::routes::AppState;

/// The authenticated account, available to handlers behind the guard
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

/// Middleware guarding authenticated routes.
///
/// Accepts the session token from an `Authorization: Bearer` header or
/// the session cookie, verifies it, and resolves the account. The token
/// may outlive the account, so a missing user is still a 401.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .or_else(|| jar.get(SESSION_COOKIE).map(|c| c.value().to_string()))
        .ok_or_else(|| {
            AppError::Unauthorized("You are not logged in. Please log in to get access".to_string())
        })?;

    let claims = verify_token(&token, &state.config.jwt_secret)?;

    let user = state
        .users
        .find_by_id(claims.sub)
        .await?
        .ok_or_else(|| {
            AppError::Unauthorized(
                "The user belonging to this session no longer exists".to_string(),
            )
        })?;

    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string())
}
