use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::{
    cache::{Cache, CacheKey},
    cached,
    error::AppResult,
    models::catalog::{
        CatalogItem, CatalogPage, Genre, MovieCategory, MovieCredits, MovieDetails, TvCategory,
        TvDetails,
    },
    services::{featured, providers::CatalogProvider},
};

const PAGE_TTL: Duration = Duration::from_secs(5 * 60);
const DETAILS_TTL: Duration = Duration::from_secs(30 * 60);
const GENRES_TTL: Duration = Duration::from_secs(24 * 60 * 60);
const FEATURED_TTL: Duration = Duration::from_secs(60 * 60);

/// Cached reads against the content-metadata upstream
///
/// Every call goes through the TTL cache; the upstream is rate limited,
/// so identical requests within a TTL window cost one call. The cache is
/// an optimization only — a miss or failure there falls through to a
/// fresh fetch.
#[derive(Clone)]
pub struct CatalogService {
    provider: Arc<dyn CatalogProvider>,
    cache: Cache,
}

impl CatalogService {
    pub fn new(provider: Arc<dyn CatalogProvider>, cache: Cache) -> Self {
        Self { provider, cache }
    }

    pub async fn movie_page(&self, category: MovieCategory, page: u32) -> AppResult<CatalogPage> {
        let page = page.max(1);
        cached!(
            self.cache,
            CacheKey::Movies(category, page),
            PAGE_TTL,
            async { self.provider.movie_page(category, page).await }
        )
    }

    pub async fn tv_page(&self, category: TvCategory, page: u32) -> AppResult<CatalogPage> {
        let page = page.max(1);
        cached!(self.cache, CacheKey::Tv(category, page), PAGE_TTL, async {
            self.provider.tv_page(category, page).await
        })
    }

    pub async fn trending(&self, page: u32) -> AppResult<CatalogPage> {
        let page = page.max(1);
        cached!(self.cache, CacheKey::Trending(page), PAGE_TTL, async {
            self.provider.trending(page).await
        })
    }

    pub async fn search(&self, query: &str, page: u32) -> AppResult<CatalogPage> {
        let page = page.max(1);
        let key = CacheKey::Search {
            query: query.to_string(),
            page,
        };
        cached!(self.cache, key, PAGE_TTL, async {
            self.provider.search(query, page).await
        })
    }

    pub async fn genres(&self) -> AppResult<Vec<Genre>> {
        cached!(self.cache, CacheKey::Genres, GENRES_TTL, async {
            self.provider.genres().await
        })
    }

    pub async fn movie_details(&self, id: u64) -> AppResult<MovieDetails> {
        cached!(self.cache, CacheKey::MovieDetails(id), DETAILS_TTL, async {
            self.provider.movie_details(id).await
        })
    }

    pub async fn movie_credits(&self, id: u64) -> AppResult<MovieCredits> {
        cached!(self.cache, CacheKey::MovieCredits(id), DETAILS_TTL, async {
            self.provider.movie_credits(id).await
        })
    }

    pub async fn tv_details(&self, id: u64) -> AppResult<TvDetails> {
        cached!(self.cache, CacheKey::TvDetails(id), DETAILS_TTL, async {
            self.provider.tv_details(id).await
        })
    }

    /// Picks today's featured movie from the top-rated and popular pools
    pub async fn featured(&self, now: DateTime<Utc>) -> AppResult<CatalogItem> {
        cached!(self.cache, CacheKey::Featured, FEATURED_TTL, async {
            let (top_rated, popular) = tokio::try_join!(
                self.provider.movie_page(MovieCategory::TopRated, 1),
                self.provider.movie_page(MovieCategory::Popular, 1),
            )?;

            let candidates = featured::merge_candidates([top_rated.results, popular.results]);

            tracing::info!(candidates = candidates.len(), "Selecting featured item");

            featured::select_featured(&candidates, now)
        })
    }
}
