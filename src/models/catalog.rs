use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::MediaType;

/// Movie listing categories exposed by the content API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieCategory {
    Popular,
    TopRated,
    NowPlaying,
    Upcoming,
}

impl MovieCategory {
    /// Path segment used by the upstream API
    pub fn as_path(&self) -> &'static str {
        match self {
            MovieCategory::Popular => "popular",
            MovieCategory::TopRated => "top_rated",
            MovieCategory::NowPlaying => "now_playing",
            MovieCategory::Upcoming => "upcoming",
        }
    }
}

/// TV listing categories exposed by the content API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TvCategory {
    Popular,
    TopRated,
}

impl TvCategory {
    pub fn as_path(&self) -> &'static str {
        match self {
            TvCategory::Popular => "popular",
            TvCategory::TopRated => "top_rated",
        }
    }
}

/// One page of results from the content API
///
/// Shared by movie listings, TV listings, trending and multi-search;
/// the upstream always returns the same paging envelope.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogPage {
    pub page: u32,
    #[serde(default)]
    pub results: Vec<CatalogItem>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// A movie or TV show as listed by the content API
///
/// Movies carry `title`/`release_date`, shows carry `name`/`first_air_date`;
/// multi-search results additionally tag themselves with `media_type`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogItem {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub media_type: Option<MediaType>,
}

impl CatalogItem {
    /// Display title regardless of medium
    pub fn display_title(&self) -> &str {
        self.title
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or_default()
    }

    /// Parsed release date (`release_date` for movies, `first_air_date`
    /// for shows). The upstream sometimes sends an empty string; that and
    /// any other unparsable value read as `None`.
    pub fn released_on(&self) -> Option<NaiveDate> {
        self.release_date
            .as_deref()
            .or(self.first_air_date.as_deref())
            .and_then(|raw| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
    }
}

/// A genre as defined by the content API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

/// Wire shape of the upstream genre list endpoints
#[derive(Debug, Deserialize)]
pub struct GenreListResponse {
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Full movie details from the content API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieDetails {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub tagline: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Full TV show details from the content API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TvDetails {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genres: Vec<Genre>,
}

/// Cast credits for a movie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieCredits {
    pub id: u64,
    #[serde(default)]
    pub cast: Vec<CastMember>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: Option<u32>,
}
