use std::fmt::Display;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub const MAX_LIST_NAME_LEN: usize = 100;

/// Kind of a user list
///
/// The three default lists exist at most once per user; custom lists are
/// unbounded (subject to the per-user name uniqueness rule).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListType {
    Watchlist,
    Liked,
    Rated,
    Custom,
}

impl ListType {
    pub const DEFAULTS: [ListType; 3] = [ListType::Watchlist, ListType::Liked, ListType::Rated];

    pub fn as_str(&self) -> &'static str {
        match self {
            ListType::Watchlist => "watchlist",
            ListType::Liked => "liked",
            ListType::Rated => "rated",
            ListType::Custom => "custom",
        }
    }

    /// Fixed display name for default lists; `None` for custom lists
    pub fn default_name(&self) -> Option<&'static str> {
        match self {
            ListType::Watchlist => Some("Watchlist"),
            ListType::Liked => Some("Liked"),
            ListType::Rated => Some("Rated"),
            ListType::Custom => None,
        }
    }
}

impl Display for ListType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ListType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "watchlist" => Ok(ListType::Watchlist),
            "liked" => Ok(ListType::Liked),
            "rated" => Ok(ListType::Rated),
            "custom" => Ok(ListType::Custom),
            _ => Err(AppError::InvalidInput(format!("Invalid list type \"{}\"", s))),
        }
    }
}

/// A movie entry inside a list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieItem {
    pub movie_id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// A user-owned list of movies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct List {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub is_default: bool,
    pub list_type: ListType,
    pub movies: Vec<MovieItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl List {
    pub fn contains(&self, movie_id: i64) -> bool {
        self.movies.iter().any(|m| m.movie_id == movie_id)
    }
}

/// Fields required to create a list
#[derive(Debug, Clone)]
pub struct NewList {
    pub user_id: Uuid,
    pub name: String,
    pub is_default: bool,
    pub list_type: ListType,
}

impl NewList {
    pub fn custom(user_id: Uuid, name: String) -> Self {
        Self {
            user_id,
            name,
            is_default: false,
            list_type: ListType::Custom,
        }
    }

    /// The default list of the given type with its fixed display name.
    /// Only meaningful for the three default types.
    pub fn default_of(user_id: Uuid, list_type: ListType) -> Self {
        let name = list_type.default_name().unwrap_or("Custom").to_string();
        Self {
            user_id,
            name,
            is_default: true,
            list_type,
        }
    }
}

/// Trims and validates a client-supplied list name
pub fn validate_list_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("List name is required".to_string()));
    }
    if name.len() > MAX_LIST_NAME_LEN {
        return Err(AppError::InvalidInput(format!(
            "List name cannot exceed {} characters",
            MAX_LIST_NAME_LEN
        )));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_list_name_trims() {
        assert_eq!(validate_list_name("  Horror Night  ").unwrap(), "Horror Night");
    }

    #[test]
    fn test_validate_list_name_rejects_empty() {
        assert!(validate_list_name("").is_err());
        assert!(validate_list_name("   ").is_err());
    }

    #[test]
    fn test_validate_list_name_rejects_too_long() {
        let long = "x".repeat(MAX_LIST_NAME_LEN + 1);
        assert!(validate_list_name(&long).is_err());

        let max = "x".repeat(MAX_LIST_NAME_LEN);
        assert!(validate_list_name(&max).is_ok());
    }

    #[test]
    fn test_list_type_round_trip() {
        for t in [
            ListType::Watchlist,
            ListType::Liked,
            ListType::Rated,
            ListType::Custom,
        ] {
            assert_eq!(t.as_str().parse::<ListType>().unwrap(), t);
        }
    }

    #[test]
    fn test_default_names() {
        assert_eq!(ListType::Watchlist.default_name(), Some("Watchlist"));
        assert_eq!(ListType::Liked.default_name(), Some("Liked"));
        assert_eq!(ListType::Rated.default_name(), Some("Rated"));
        assert_eq!(ListType::Custom.default_name(), None);
    }

    #[test]
    fn test_contains_matches_by_movie_id() {
        let list = List {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Watchlist".to_string(),
            is_default: true,
            list_type: ListType::Watchlist,
            movies: vec![MovieItem {
                movie_id: 550,
                title: "Fight Club".to_string(),
                poster_path: None,
                release_date: None,
                added_at: Utc::now(),
            }],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert!(list.contains(550));
        assert!(!list.contains(551));
    }
}
