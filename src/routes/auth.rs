use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect},
    Extension, Json,
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::auth::{
    clear_session_cookie, hash_password, session_cookie, sign_token, verify_password,
};
use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::models::user::{validate_email, validate_name, validate_password};
use crate::models::NewUser;

use super::{success, AppState};

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct GoogleCallbackQuery {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Registers an account, creates its default lists and opens a session
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    let name = validate_name(&request.name)?;
    let email = validate_email(&request.email)?;
    validate_password(&request.password)?;

    let password_hash = hash_password(&request.password)?;

    let user = state
        .users
        .insert(NewUser {
            name,
            email,
            password_hash: Some(password_hash),
            google_id: None,
        })
        .await?;

    state.lists.ensure_default_lists(user.id).await?;

    tracing::info!(user_id = %user.id, "Account created");

    let token = sign_token(
        user.id,
        &state.config.jwt_secret,
        state.config.jwt_expires_in_days,
    )?;
    let jar = jar.add(session_cookie(token.clone(), &state.config));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(json!({
            "status": "success",
            "token": token,
            "data": { "user": user }
        })),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(AppError::InvalidInput(
            "Please provide email and password".to_string(),
        ));
    }

    let email = request.email.trim().to_lowercase();

    // The same message for an unknown email and a wrong password, so the
    // response does not leak which accounts exist.
    let denied = || AppError::Unauthorized("Incorrect email or password".to_string());

    let user = state
        .users
        .find_by_email(&email)
        .await?
        .ok_or_else(denied)?;

    let hash = user.password_hash.clone().ok_or_else(denied)?;
    if !verify_password(&request.password, &hash)? {
        return Err(denied());
    }

    let token = sign_token(
        user.id,
        &state.config.jwt_secret,
        state.config.jwt_expires_in_days,
    )?;
    let jar = jar.add(session_cookie(token.clone(), &state.config));

    Ok((
        StatusCode::OK,
        jar,
        Json(json!({
            "status": "success",
            "token": token,
            "data": { "user": user }
        })),
    ))
}

pub async fn logout(jar: CookieJar) -> impl IntoResponse {
    let jar = jar.add(clear_session_cookie());
    (jar, Json(json!({ "status": "success", "data": null })))
}

/// Current account, resolved by the auth middleware
pub async fn me(Extension(CurrentUser(user)): Extension<CurrentUser>) -> impl IntoResponse {
    success(json!({ "user": user }))
}

/// Sends the browser to Google's consent page
pub async fn google_redirect(State(state): State<AppState>) -> AppResult<Redirect> {
    let google = state
        .google
        .as_ref()
        .ok_or_else(|| AppError::Internal("Google OAuth is not configured".to_string()))?;

    Ok(Redirect::temporary(&google.authorize_url()))
}

/// Handles the OAuth callback: exchanges the code, upserts the account
/// and opens a session. Failures bounce back to the sign-in page rather
/// than render an API error to the browser.
pub async fn google_callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(query): Query<GoogleCallbackQuery>,
) -> AppResult<impl IntoResponse> {
    let google = state
        .google
        .as_ref()
        .ok_or_else(|| AppError::Internal("Google OAuth is not configured".to_string()))?;

    let failure = format!(
        "{}/auth/signin?error=google_auth_failed",
        state.config.frontend_url
    );

    let Some(code) = query.code.filter(|c| !c.is_empty()) else {
        tracing::warn!(error = ?query.error, "Google callback without authorization code");
        return Ok((jar, Redirect::temporary(&failure)));
    };

    let profile = match google.exchange_code(&code).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::error!(error = %e, "Google code exchange failed");
            return Ok((jar, Redirect::temporary(&failure)));
        }
    };

    let email = profile.email.trim().to_lowercase();

    let user = match state.users.find_by_google_id(&profile.id).await? {
        Some(user) => user,
        None => match state.users.find_by_email(&email).await? {
            // Known email signing in through Google for the first time:
            // link the identity instead of creating a duplicate account.
            Some(user) => {
                state.users.set_google_id(user.id, &profile.id).await?;
                user
            }
            None => {
                state
                    .users
                    .insert(NewUser {
                        name: profile.name.clone().unwrap_or_else(|| email.clone()),
                        email,
                        password_hash: None,
                        google_id: Some(profile.id.clone()),
                    })
                    .await?
            }
        },
    };

    state.lists.ensure_default_lists(user.id).await?;

    let token = sign_token(
        user.id,
        &state.config.jwt_secret,
        state.config.jwt_expires_in_days,
    )?;
    let jar = jar.add(session_cookie(token, &state.config));

    let destination = format!("{}/auth/google-success", state.config.frontend_url);
    Ok((jar, Redirect::temporary(&destination)))
}
