//! In-memory test doubles: repositories backed by plain vectors and a
//! canned catalog provider, wired into a real `AppState` so the router
//! and services run unmodified.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use cinescope_api::cache::Cache;
use cinescope_api::config::Config;
use cinescope_api::db::{ListRepository, RatingRepository, UserRepository};
use cinescope_api::error::{AppError, AppResult};
use cinescope_api::models::catalog::{
    CastMember, CatalogItem, CatalogPage, Genre, MovieCategory, MovieCredits, MovieDetails,
    TvCategory, TvDetails,
};
use cinescope_api::models::{
    List, ListType, MediaType, MovieItem, NewList, NewRating, NewUser, Rating, User,
};
use cinescope_api::routes::AppState;
use cinescope_api::services::providers::CatalogProvider;
use cinescope_api::services::{CatalogService, ListService, RatingService};

// ---------------------------------------------------------------------------
// Users

#[derive(Default)]
pub struct InMemoryUsers {
    users: RwLock<Vec<User>>,
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>> {
        Ok(self.users.read().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_google_id(&self, google_id: &str) -> AppResult<Option<User>> {
        Ok(self
            .users
            .read()
            .await
            .iter()
            .find(|u| u.google_id.as_deref() == Some(google_id))
            .cloned())
    }

    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        if users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(
                "An account with this email already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            google_id: user.google_id,
            created_at: now,
            updated_at: now,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn set_google_id(&self, id: Uuid, google_id: &str) -> AppResult<()> {
        let mut users = self.users.write().await;
        if let Some(user) = users.iter_mut().find(|u| u.id == id) {
            user.google_id = Some(google_id.to_string());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Lists

#[derive(Default)]
pub struct InMemoryLists {
    lists: RwLock<Vec<List>>,
}

#[async_trait]
impl ListRepository for InMemoryLists {
    async fn find_all(&self, user_id: Uuid) -> AppResult<Vec<List>> {
        let mut lists: Vec<List> = self
            .lists
            .read()
            .await
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect();
        lists.sort_by(|a, b| {
            b.is_default
                .cmp(&a.is_default)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(lists)
    }

    async fn find_by_id(&self, user_id: Uuid, list_id: Uuid) -> AppResult<Option<List>> {
        Ok(self
            .lists
            .read()
            .await
            .iter()
            .find(|l| l.id == list_id && l.user_id == user_id)
            .cloned())
    }

    async fn find_by_name(&self, user_id: Uuid, name: &str) -> AppResult<Option<List>> {
        Ok(self
            .lists
            .read()
            .await
            .iter()
            .find(|l| l.user_id == user_id && l.name == name)
            .cloned())
    }

    async fn find_by_type(&self, user_id: Uuid, list_type: ListType) -> AppResult<Option<List>> {
        Ok(self
            .lists
            .read()
            .await
            .iter()
            .find(|l| l.user_id == user_id && l.is_default && l.list_type == list_type)
            .cloned())
    }

    async fn find_defaults(&self, user_id: Uuid) -> AppResult<Vec<List>> {
        Ok(self
            .lists
            .read()
            .await
            .iter()
            .filter(|l| l.user_id == user_id && l.is_default)
            .cloned()
            .collect())
    }

    async fn insert(&self, list: NewList) -> AppResult<List> {
        let mut lists = self.lists.write().await;

        // Same constraints the database enforces.
        if lists
            .iter()
            .any(|l| l.user_id == list.user_id && l.name == list.name)
        {
            return Err(AppError::Conflict(
                "A list with this name already exists".to_string(),
            ));
        }
        if list.is_default
            && lists
                .iter()
                .any(|l| l.user_id == list.user_id && l.is_default && l.list_type == list.list_type)
        {
            return Err(AppError::Conflict(
                "A default list of this type already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let created = List {
            id: Uuid::new_v4(),
            user_id: list.user_id,
            name: list.name,
            is_default: list.is_default,
            list_type: list.list_type,
            movies: Vec::new(),
            created_at: now,
            updated_at: now,
        };
        lists.push(created.clone());
        Ok(created)
    }

    async fn rename(&self, list_id: Uuid, name: &str) -> AppResult<()> {
        let mut lists = self.lists.write().await;

        let owner = lists
            .iter()
            .find(|l| l.id == list_id)
            .map(|l| l.user_id);
        if let Some(user_id) = owner {
            if lists
                .iter()
                .any(|l| l.user_id == user_id && l.id != list_id && l.name == name)
            {
                return Err(AppError::Conflict(
                    "A list with this name already exists".to_string(),
                ));
            }
        }

        if let Some(list) = lists.iter_mut().find(|l| l.id == list_id) {
            list.name = name.to_string();
            list.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn delete(&self, list_id: Uuid) -> AppResult<()> {
        self.lists.write().await.retain(|l| l.id != list_id);
        Ok(())
    }

    async fn add_item(&self, list_id: Uuid, item: &MovieItem) -> AppResult<()> {
        let mut lists = self.lists.write().await;
        let Some(list) = lists.iter_mut().find(|l| l.id == list_id) else {
            return Ok(());
        };

        if list.movies.iter().any(|m| m.movie_id == item.movie_id) {
            return Err(AppError::Conflict(
                "Movie already exists in this list".to_string(),
            ));
        }

        list.movies.push(item.clone());
        list.updated_at = Utc::now();
        Ok(())
    }

    async fn remove_item(&self, list_id: Uuid, movie_id: i64) -> AppResult<()> {
        let mut lists = self.lists.write().await;
        if let Some(list) = lists.iter_mut().find(|l| l.id == list_id) {
            list.movies.retain(|m| m.movie_id != movie_id);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Ratings

#[derive(Default)]
pub struct InMemoryRatings {
    ratings: RwLock<Vec<Rating>>,
}

#[async_trait]
impl RatingRepository for InMemoryRatings {
    async fn find(
        &self,
        user_id: Uuid,
        movie_id: i64,
        media_type: MediaType,
    ) -> AppResult<Option<Rating>> {
        Ok(self
            .ratings
            .read()
            .await
            .iter()
            .find(|r| r.user_id == user_id && r.movie_id == movie_id && r.media_type == media_type)
            .cloned())
    }

    async fn find_all(&self, user_id: Uuid) -> AppResult<Vec<Rating>> {
        let mut ratings: Vec<Rating> = self
            .ratings
            .read()
            .await
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect();
        ratings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(ratings)
    }

    async fn insert(&self, rating: NewRating) -> AppResult<Rating> {
        let mut ratings = self.ratings.write().await;
        if ratings.iter().any(|r| {
            r.user_id == rating.user_id
                && r.movie_id == rating.movie_id
                && r.media_type == rating.media_type
        }) {
            return Err(AppError::Conflict(
                "A rating for this title already exists".to_string(),
            ));
        }

        let now = Utc::now();
        let created = Rating {
            id: Uuid::new_v4(),
            user_id: rating.user_id,
            movie_id: rating.movie_id,
            media_type: rating.media_type,
            rating: rating.rating,
            created_at: now,
            updated_at: now,
        };
        ratings.push(created.clone());
        Ok(created)
    }

    async fn update_value(&self, rating_id: Uuid, value: i16) -> AppResult<Rating> {
        let mut ratings = self.ratings.write().await;
        let rating = ratings
            .iter_mut()
            .find(|r| r.id == rating_id)
            .ok_or_else(|| AppError::NotFound("No rating found".to_string()))?;
        rating.rating = value;
        rating.updated_at = Utc::now();
        Ok(rating.clone())
    }

    async fn delete(&self, user_id: Uuid, movie_id: i64, media_type: MediaType) -> AppResult<()> {
        self.ratings.write().await.retain(|r| {
            !(r.user_id == user_id && r.movie_id == movie_id && r.media_type == media_type)
        });
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Catalog provider stub

/// Canned catalog data. The top-rated and popular pools overlap on id 200
/// (a recent, well-voted release) so featured selection has a known
/// winner.
pub struct StubCatalogProvider;

pub fn movie(id: u64, vote_average: f64, vote_count: u64, release_date: &str) -> CatalogItem {
    CatalogItem {
        id,
        title: Some(format!("Movie {}", id)),
        name: None,
        overview: None,
        poster_path: None,
        backdrop_path: None,
        release_date: Some(release_date.to_string()),
        first_air_date: None,
        vote_average,
        vote_count,
        genre_ids: vec![18],
        popularity: 10.0,
        media_type: None,
    }
}

fn page(results: Vec<CatalogItem>) -> CatalogPage {
    CatalogPage {
        page: 1,
        total_pages: 1,
        total_results: results.len() as u32,
        results,
    }
}

fn recent_date(days_ago: i64) -> String {
    (Utc::now() - chrono::Duration::days(days_ago))
        .format("%Y-%m-%d")
        .to_string()
}

#[async_trait]
impl CatalogProvider for StubCatalogProvider {
    async fn movie_page(&self, category: MovieCategory, _page: u32) -> AppResult<CatalogPage> {
        match category {
            MovieCategory::TopRated => Ok(page(vec![
                movie(100, 8.7, 25000, "2005-03-01"),
                movie(200, 8.1, 4000, &recent_date(10)),
            ])),
            _ => Ok(page(vec![
                movie(200, 8.1, 4000, &recent_date(10)),
                movie(300, 5.5, 800, &recent_date(3)),
            ])),
        }
    }

    async fn tv_page(&self, _category: TvCategory, _page: u32) -> AppResult<CatalogPage> {
        let mut show = movie(1396, 8.9, 12000, "");
        show.title = None;
        show.name = Some("Show 1396".to_string());
        show.release_date = None;
        show.first_air_date = Some("2008-01-20".to_string());
        Ok(page(vec![show]))
    }

    async fn trending(&self, _page: u32) -> AppResult<CatalogPage> {
        Ok(page(vec![movie(300, 5.5, 800, &recent_date(3))]))
    }

    async fn search(&self, query: &str, _page: u32) -> AppResult<CatalogPage> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }
        Ok(page(vec![movie(550, 8.4, 27000, "1999-10-15")]))
    }

    async fn genres(&self) -> AppResult<Vec<Genre>> {
        Ok(vec![
            Genre {
                id: 28,
                name: "Action".to_string(),
            },
            Genre {
                id: 18,
                name: "Drama".to_string(),
            },
        ])
    }

    async fn movie_details(&self, id: u64) -> AppResult<MovieDetails> {
        Ok(MovieDetails {
            id,
            title: format!("Movie {}", id),
            overview: Some("Canned overview".to_string()),
            tagline: None,
            poster_path: None,
            backdrop_path: None,
            release_date: Some("1999-10-15".to_string()),
            runtime: Some(139),
            status: Some("Released".to_string()),
            vote_average: 8.4,
            vote_count: 27000,
            popularity: 61.4,
            genres: vec![Genre {
                id: 18,
                name: "Drama".to_string(),
            }],
        })
    }

    async fn movie_credits(&self, id: u64) -> AppResult<MovieCredits> {
        Ok(MovieCredits {
            id,
            cast: vec![CastMember {
                id: 819,
                name: "Edward Norton".to_string(),
                character: Some("The Narrator".to_string()),
                profile_path: None,
                order: Some(0),
            }],
        })
    }

    async fn tv_details(&self, id: u64) -> AppResult<TvDetails> {
        Ok(TvDetails {
            id,
            name: format!("Show {}", id),
            overview: None,
            poster_path: None,
            backdrop_path: None,
            first_air_date: Some("2008-01-20".to_string()),
            number_of_seasons: Some(5),
            number_of_episodes: Some(62),
            status: Some("Ended".to_string()),
            vote_average: 8.9,
            vote_count: 12000,
            genres: vec![],
        })
    }
}

// ---------------------------------------------------------------------------
// State wiring

pub fn test_config() -> Config {
    Config {
        database_url: "postgres://unused".to_string(),
        tmdb_api_key: "test-key".to_string(),
        tmdb_api_url: "http://tmdb.invalid".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_expires_in_days: 7,
        cookie_secure: false,
        frontend_url: "http://localhost:3000".to_string(),
        google_client_id: None,
        google_client_secret: None,
        google_redirect_url: None,
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}

pub fn test_state() -> AppState {
    let lists = ListService::new(Arc::new(InMemoryLists::default()));
    let ratings = RatingService::new(Arc::new(InMemoryRatings::default()), lists.clone());

    AppState {
        config: Arc::new(test_config()),
        users: Arc::new(InMemoryUsers::default()),
        lists,
        ratings,
        catalog: CatalogService::new(Arc::new(StubCatalogProvider), Cache::new()),
        google: None,
    }
}
