use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::{ListType, MovieItem};

use super::{success, AppState};

#[derive(Debug, Deserialize)]
pub struct ListNameRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddMovieRequest {
    pub movie_id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
}

/// All lists of the current user
pub async fn all(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> AppResult<impl IntoResponse> {
    let lists = state.lists.all(user.id).await?;

    Ok(Json(json!({
        "status": "success",
        "results": lists.len(),
        "data": { "lists": lists }
    })))
}

pub async fn one(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(list_id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let list = state.lists.get(user.id, list_id).await?;
    Ok(success(json!({ "list": list })))
}

pub async fn create(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(request): Json<ListNameRequest>,
) -> AppResult<impl IntoResponse> {
    let list = state.lists.create(user.id, &request.name).await?;
    Ok((StatusCode::CREATED, success(json!({ "list": list }))))
}

pub async fn rename(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(list_id): Path<Uuid>,
    Json(request): Json<ListNameRequest>,
) -> AppResult<impl IntoResponse> {
    let list = state.lists.rename(user.id, list_id, &request.name).await?;
    Ok(success(json!({ "list": list })))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(list_id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.lists.delete(user.id, list_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_movie(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(list_id): Path<Uuid>,
    Json(request): Json<AddMovieRequest>,
) -> AppResult<impl IntoResponse> {
    let item = MovieItem {
        movie_id: request.movie_id,
        title: request.title,
        poster_path: request.poster_path,
        release_date: request.release_date,
        added_at: Utc::now(),
    };

    let list = state.lists.add_movie(user.id, list_id, item).await?;
    Ok(success(json!({ "list": list })))
}

pub async fn remove_movie(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((list_id, movie_id)): Path<(Uuid, i64)>,
) -> AppResult<impl IntoResponse> {
    let list = state.lists.remove_movie(user.id, list_id, movie_id).await?;
    Ok(success(json!({ "list": list })))
}

/// Quick access to a default list by type, created on first use
pub async fn by_type(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(list_type): Path<String>,
) -> AppResult<impl IntoResponse> {
    let list_type: ListType = list_type.parse()?;
    let list = state.lists.get_by_type(user.id, list_type).await?;
    Ok(success(json!({ "list": list })))
}
