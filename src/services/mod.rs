pub mod catalog;
pub mod featured;
pub mod lists;
pub mod providers;
pub mod ratings;

pub use catalog::CatalogService;
pub use lists::ListService;
pub use ratings::{RateInput, RatingService};
