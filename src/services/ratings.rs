use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::db::RatingRepository;
use crate::error::{AppError, AppResult};
use crate::models::{
    rating::validate_rating_value, ListType, MediaType, MovieItem, NewRating, Rating,
};
use crate::services::lists::ListService;

/// A rating submission
#[derive(Debug, Clone)]
pub struct RateInput {
    pub movie_id: i64,
    pub media_type: MediaType,
    pub rating: i16,
    pub title: Option<String>,
    pub poster_path: Option<String>,
    pub release_date: Option<String>,
}

/// Business rules for ratings
///
/// Writes are upserts against the (user, movie, media type) tuple. When a
/// submission carries a title, the item is mirrored into the user's Rated
/// list; removing the rating takes it out again.
#[derive(Clone)]
pub struct RatingService {
    ratings: Arc<dyn RatingRepository>,
    lists: ListService,
}

impl RatingService {
    pub fn new(ratings: Arc<dyn RatingRepository>, lists: ListService) -> Self {
        Self { ratings, lists }
    }

    pub async fn rate(&self, user_id: Uuid, input: RateInput) -> AppResult<Rating> {
        if input.movie_id <= 0 {
            return Err(AppError::InvalidInput(
                "A valid movie ID is required".to_string(),
            ));
        }
        let value = validate_rating_value(input.rating)?;

        let rating = match self
            .ratings
            .find(user_id, input.movie_id, input.media_type)
            .await?
        {
            Some(existing) => self.ratings.update_value(existing.id, value).await?,
            None => {
                let new = NewRating {
                    user_id,
                    movie_id: input.movie_id,
                    media_type: input.media_type,
                    rating: value,
                };
                match self.ratings.insert(new).await {
                    Ok(rating) => rating,
                    // Lost an insert race; the row exists now, update it.
                    Err(AppError::Conflict(_)) => {
                        let existing = self
                            .ratings
                            .find(user_id, input.movie_id, input.media_type)
                            .await?
                            .ok_or_else(|| {
                                AppError::Internal(
                                    "Rating missing after insert conflict".to_string(),
                                )
                            })?;
                        self.ratings.update_value(existing.id, value).await?
                    }
                    Err(e) => return Err(e),
                }
            }
        };

        tracing::info!(
            user_id = %user_id,
            movie_id = input.movie_id,
            media_type = %input.media_type,
            rating = value,
            "Rating stored"
        );

        if input.title.is_some() {
            self.sync_rated_list(user_id, &input).await?;
        }

        Ok(rating)
    }

    pub async fn get(
        &self,
        user_id: Uuid,
        movie_id: i64,
        media_type: MediaType,
    ) -> AppResult<Option<Rating>> {
        self.ratings.find(user_id, movie_id, media_type).await
    }

    pub async fn all(&self, user_id: Uuid) -> AppResult<Vec<Rating>> {
        self.ratings.find_all(user_id).await
    }

    /// Removes a rating and its Rated-list entry; both are idempotent
    pub async fn remove(
        &self,
        user_id: Uuid,
        movie_id: i64,
        media_type: MediaType,
    ) -> AppResult<()> {
        self.ratings.delete(user_id, movie_id, media_type).await?;

        if let Some(rated) = self.lists.try_get_by_type(user_id, ListType::Rated).await? {
            self.lists.remove_movie(user_id, rated.id, movie_id).await?;
        }

        Ok(())
    }

    async fn sync_rated_list(&self, user_id: Uuid, input: &RateInput) -> AppResult<()> {
        let rated = self.lists.get_by_type(user_id, ListType::Rated).await?;
        if rated.contains(input.movie_id) {
            return Ok(());
        }

        let item = MovieItem {
            movie_id: input.movie_id,
            title: input.title.clone().unwrap_or_default(),
            poster_path: input.poster_path.clone(),
            release_date: input.release_date.clone(),
            added_at: Utc::now(),
        };

        match self.lists.add_movie(user_id, rated.id, item).await {
            Ok(_) => Ok(()),
            // Raced another writer into the list; already there is fine.
            Err(AppError::Conflict(_)) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
