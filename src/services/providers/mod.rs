/// Catalog data provider abstraction
///
/// The metadata upstream sits behind a trait so handlers and services can
/// be exercised against a stub. The single production implementation
/// talks to TMDB.
use crate::{
    error::AppResult,
    models::catalog::{
        CatalogPage, Genre, MovieCategory, MovieCredits, MovieDetails, TvCategory, TvDetails,
    },
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for content-metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// One page of a movie listing (popular, top rated, now playing,
    /// upcoming)
    async fn movie_page(&self, category: MovieCategory, page: u32) -> AppResult<CatalogPage>;

    /// One page of a TV listing
    async fn tv_page(&self, category: TvCategory, page: u32) -> AppResult<CatalogPage>;

    /// One page of today's trending items across media types
    async fn trending(&self, page: u32) -> AppResult<CatalogPage>;

    /// Free-text multi-search over movies and shows
    async fn search(&self, query: &str, page: u32) -> AppResult<CatalogPage>;

    /// Merged movie + TV genre list
    async fn genres(&self) -> AppResult<Vec<Genre>>;

    async fn movie_details(&self, id: u64) -> AppResult<MovieDetails>;

    async fn movie_credits(&self, id: u64) -> AppResult<MovieCredits>;

    async fn tv_details(&self, id: u64) -> AppResult<TvDetails>;
}
