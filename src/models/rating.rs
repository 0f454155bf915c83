use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::MediaType;
use crate::error::{AppError, AppResult};

pub const MIN_RATING: i16 = 1;
pub const MAX_RATING: i16 = 10;

/// A user's rating of one movie or show
///
/// Exactly one rating exists per (user, movie, media type); writes are
/// upserts against that tuple.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub id: Uuid,
    pub user_id: Uuid,
    pub movie_id: i64,
    pub media_type: MediaType,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a rating
#[derive(Debug, Clone)]
pub struct NewRating {
    pub user_id: Uuid,
    pub movie_id: i64,
    pub media_type: MediaType,
    pub rating: i16,
}

/// Rejects out-of-range rating values before anything touches the store
pub fn validate_rating_value(value: i16) -> AppResult<i16> {
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(AppError::InvalidInput(format!(
            "Rating must be between {} and {}",
            MIN_RATING, MAX_RATING
        )));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rating_accepts_bounds() {
        assert_eq!(validate_rating_value(1).unwrap(), 1);
        assert_eq!(validate_rating_value(10).unwrap(), 10);
        assert_eq!(validate_rating_value(7).unwrap(), 7);
    }

    #[test]
    fn test_validate_rating_rejects_out_of_range() {
        assert!(validate_rating_value(0).is_err());
        assert!(validate_rating_value(11).is_err());
        assert!(validate_rating_value(-3).is_err());
    }
}
