/// TMDB provider
///
/// Read-only access to the TMDB REST API. Every request carries the API
/// key and an `en-US` language tag; responses use the standard paging
/// envelope deserialized in `models::catalog`.
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;

use crate::{
    error::{AppError, AppResult},
    models::catalog::{
        CatalogPage, Genre, GenreListResponse, MovieCategory, MovieCredits, MovieDetails,
        TvCategory, TvDetails,
    },
    services::providers::CatalogProvider,
};

pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);

        tracing::debug!(path = %path, "Fetching from TMDB");

        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("language", "en-US"),
            ])
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!(
                path = %path,
                status = %status,
                body = %body,
                "TMDB request failed"
            );
            return Err(AppError::ExternalApi(format!(
                "TMDB returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn movie_page(&self, category: MovieCategory, page: u32) -> AppResult<CatalogPage> {
        let page: CatalogPage = self
            .get_json(
                &format!("/movie/{}", category.as_path()),
                &[("page", page.to_string())],
            )
            .await?;

        tracing::info!(
            category = category.as_path(),
            page = page.page,
            results = page.results.len(),
            "Movie listing fetched"
        );

        Ok(page)
    }

    async fn tv_page(&self, category: TvCategory, page: u32) -> AppResult<CatalogPage> {
        self.get_json(
            &format!("/tv/{}", category.as_path()),
            &[("page", page.to_string())],
        )
        .await
    }

    async fn trending(&self, page: u32) -> AppResult<CatalogPage> {
        self.get_json("/trending/all/day", &[("page", page.to_string())])
            .await
    }

    async fn search(&self, query: &str, page: u32) -> AppResult<CatalogPage> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let page: CatalogPage = self
            .get_json(
                "/search/multi",
                &[
                    ("query", query.to_string()),
                    ("page", page.to_string()),
                    ("include_adult", "false".to_string()),
                ],
            )
            .await?;

        tracing::info!(query = %query, results = page.results.len(), "Multi-search completed");

        Ok(page)
    }

    async fn genres(&self) -> AppResult<Vec<Genre>> {
        let (movie, tv) = tokio::try_join!(
            self.get_json::<GenreListResponse>("/genre/movie/list", &[]),
            self.get_json::<GenreListResponse>("/genre/tv/list", &[]),
        )?;

        // Movie and TV share several genre ids; first occurrence wins.
        let mut seen = std::collections::HashSet::new();
        let merged: Vec<Genre> = movie
            .genres
            .into_iter()
            .chain(tv.genres)
            .filter(|g| seen.insert(g.id))
            .collect();

        Ok(merged)
    }

    async fn movie_details(&self, id: u64) -> AppResult<MovieDetails> {
        self.get_json(&format!("/movie/{}", id), &[]).await
    }

    async fn movie_credits(&self, id: u64) -> AppResult<MovieCredits> {
        self.get_json(&format!("/movie/{}/credits", id), &[]).await
    }

    async fn tv_details(&self, id: u64) -> AppResult<TvDetails> {
        self.get_json(&format!("/tv/{}", id), &[]).await
    }
}
