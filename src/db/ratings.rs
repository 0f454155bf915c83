use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::models::{MediaType, NewRating, Rating};

/// Store operations for ratings
///
/// The (user, movie, media type) tuple is unique; a violation on insert
/// means a concurrent writer got there first and comes back as a
/// [`AppError::Conflict`] so the caller can retry as an update.
#[async_trait]
pub trait RatingRepository: Send + Sync {
    async fn find(
        &self,
        user_id: Uuid,
        movie_id: i64,
        media_type: MediaType,
    ) -> AppResult<Option<Rating>>;

    /// All ratings for a user, newest first
    async fn find_all(&self, user_id: Uuid) -> AppResult<Vec<Rating>>;

    async fn insert(&self, rating: NewRating) -> AppResult<Rating>;

    async fn update_value(&self, rating_id: Uuid, value: i16) -> AppResult<Rating>;

    /// Removes by tuple; absence is not an error
    async fn delete(&self, user_id: Uuid, movie_id: i64, media_type: MediaType) -> AppResult<()>;
}

const RATING_COLUMNS: &str = "id, user_id, movie_id, media_type, rating, created_at, updated_at";

#[derive(FromRow)]
struct RatingRow {
    id: Uuid,
    user_id: Uuid,
    movie_id: i64,
    media_type: String,
    rating: i16,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<RatingRow> for Rating {
    type Error = AppError;

    fn try_from(row: RatingRow) -> Result<Self, Self::Error> {
        let media_type: MediaType = row
            .media_type
            .parse()
            .map_err(|_| AppError::Internal(format!("Unknown media type \"{}\"", row.media_type)))?;

        Ok(Rating {
            id: row.id,
            user_id: row.user_id,
            movie_id: row.movie_id,
            media_type,
            rating: row.rating,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Clone)]
pub struct PgRatingRepository {
    pool: PgPool,
}

impl PgRatingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RatingRepository for PgRatingRepository {
    async fn find(
        &self,
        user_id: Uuid,
        movie_id: i64,
        media_type: MediaType,
    ) -> AppResult<Option<Rating>> {
        let row: Option<RatingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM ratings WHERE user_id = $1 AND movie_id = $2 AND media_type = $3",
            RATING_COLUMNS
        ))
        .bind(user_id)
        .bind(movie_id)
        .bind(media_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Rating::try_from).transpose()
    }

    async fn find_all(&self, user_id: Uuid) -> AppResult<Vec<Rating>> {
        let rows: Vec<RatingRow> = sqlx::query_as(&format!(
            "SELECT {} FROM ratings WHERE user_id = $1 ORDER BY created_at DESC",
            RATING_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Rating::try_from).collect()
    }

    async fn insert(&self, rating: NewRating) -> AppResult<Rating> {
        let row: RatingRow = sqlx::query_as(&format!(
            "INSERT INTO ratings (user_id, movie_id, media_type, rating) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            RATING_COLUMNS
        ))
        .bind(rating.user_id)
        .bind(rating.movie_id)
        .bind(rating.media_type.as_str())
        .bind(rating.rating)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("A rating for this title already exists".to_string())
            } else {
                e.into()
            }
        })?;

        Rating::try_from(row)
    }

    async fn update_value(&self, rating_id: Uuid, value: i16) -> AppResult<Rating> {
        let row: RatingRow = sqlx::query_as(&format!(
            "UPDATE ratings SET rating = $2, updated_at = now() WHERE id = $1 RETURNING {}",
            RATING_COLUMNS
        ))
        .bind(rating_id)
        .bind(value)
        .fetch_one(&self.pool)
        .await?;

        Rating::try_from(row)
    }

    async fn delete(&self, user_id: Uuid, movie_id: i64, media_type: MediaType) -> AppResult<()> {
        sqlx::query("DELETE FROM ratings WHERE user_id = $1 AND movie_id = $2 AND media_type = $3")
            .bind(user_id)
            .bind(movie_id)
            .bind(media_type.as_str())
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
