use std::fmt::Display;

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod list;
pub mod rating;
pub mod user;

pub use catalog::{CatalogItem, CatalogPage, Genre, MovieCategory, TvCategory};
pub use list::{List, ListType, MovieItem, NewList};
pub use rating::{NewRating, Rating};
pub use user::{NewUser, User};

/// Kind of media an item refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MediaType {
    type Err = crate::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            _ => Err(crate::error::AppError::InvalidInput(format!(
                "Media type must be either \"movie\" or \"tv\", got \"{}\"",
                s
            ))),
        }
    }
}
