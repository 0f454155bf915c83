use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::MediaType;
use crate::services::RateInput;

use super::{success, AppState};

#[derive(Debug, Deserialize)]
pub struct RateRequest {
    pub movie_id: i64,
    pub media_type: MediaType,
    pub rating: i16,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MediaTypeQuery {
    pub media_type: MediaType,
}

/// Rates a movie or show (upsert)
pub async fn rate(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(request): Json<RateRequest>,
) -> AppResult<impl IntoResponse> {
    let input = RateInput {
        movie_id: request.movie_id,
        media_type: request.media_type,
        rating: request.rating,
        title: request.title,
        poster_path: request.poster_path,
        release_date: request.release_date,
    };

    let rating = state.ratings.rate(user.id, input).await?;
    Ok(success(json!({ "rating": rating })))
}

/// All ratings of the current user, newest first
pub async fn all(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<impl IntoResponse> {
    let ratings = state.ratings.all(user.id).await?;

    Ok(Json(json!({
        "status": "success",
        "results": ratings.len(),
        "data": { "ratings": ratings }
    })))
}

/// The current user's rating for one title; `null` when unrated
pub async fn one(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(movie_id): Path<i64>,
    Query(query): Query<MediaTypeQuery>,
) -> AppResult<impl IntoResponse> {
    let rating = state.ratings.get(user.id, movie_id, query.media_type).await?;
    Ok(success(json!({ "rating": rating })))
}

/// Removes a rating; idempotent
pub async fn remove(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(movie_id): Path<i64>,
    Query(query): Query<MediaTypeQuery>,
) -> AppResult<impl IntoResponse> {
    state
        .ratings
        .remove(user.id, movie_id, query.media_type)
        .await?;

    Ok(Json(json!({ "status": "success", "data": null })))
}
