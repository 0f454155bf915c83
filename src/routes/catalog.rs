use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use crate::error::{AppError, AppResult};
use crate::models::{MovieCategory, TvCategory};

use super::{success, AppState};

fn default_page() -> u32 {
    1
}

#[derive(Debug, Deserialize)]
pub struct MoviesQuery {
    #[serde(default = "default_movie_category")]
    pub category: MovieCategory,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_movie_category() -> MovieCategory {
    MovieCategory::Popular
}

#[derive(Debug, Deserialize)]
pub struct TvQuery {
    #[serde(default = "default_tv_category")]
    pub category: TvCategory,
    #[serde(default = "default_page")]
    pub page: u32,
}

fn default_tv_category() -> TvCategory {
    TvCategory::Popular
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    pub page: u32,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_page")]
    pub page: u32,
}

/// One page of a movie listing
pub async fn movies(
    State(state): State<AppState>,
    Query(query): Query<MoviesQuery>,
) -> AppResult<impl IntoResponse> {
    let page = state.catalog.movie_page(query.category, query.page).await?;
    Ok(success(page))
}

/// One page of a TV listing
pub async fn tv(
    State(state): State<AppState>,
    Query(query): Query<TvQuery>,
) -> AppResult<impl IntoResponse> {
    let page = state.catalog.tv_page(query.category, query.page).await?;
    Ok(success(page))
}

/// Today's trending items across media types
pub async fn trending(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<impl IntoResponse> {
    let page = state.catalog.trending(query.page).await?;
    Ok(success(page))
}

/// Free-text search over movies and shows
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<impl IntoResponse> {
    if query.q.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "Search query cannot be empty".to_string(),
        ));
    }

    let page = state.catalog.search(&query.q, query.page).await?;
    Ok(success(page))
}

/// Merged movie + TV genre list
pub async fn genres(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let genres = state.catalog.genres().await?;
    Ok(success(json!({ "genres": genres })))
}

/// Today's featured movie
pub async fn featured(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let movie = state.catalog.featured(Utc::now()).await?;
    Ok(success(json!({ "movie": movie })))
}

pub async fn movie_details(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<impl IntoResponse> {
    let movie = state.catalog.movie_details(id).await?;
    Ok(success(json!({ "movie": movie })))
}

pub async fn movie_credits(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<impl IntoResponse> {
    let credits = state.catalog.movie_credits(id).await?;
    Ok(success(json!({ "credits": credits })))
}

pub async fn tv_details(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> AppResult<impl IntoResponse> {
    let tv = state.catalog.tv_details(id).await?;
    Ok(success(json!({ "tv": tv })))
}
