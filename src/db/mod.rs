use std::time::Duration;

use sqlx::{postgres::PgPoolOptions, PgPool};

pub mod lists;
pub mod ratings;
pub mod users;

pub use lists::{ListRepository, PgListRepository};
pub use ratings::{PgRatingRepository, RatingRepository};
pub use users::{PgUserRepository, UserRepository};

/// Creates the PostgreSQL connection pool.
///
/// An unreachable database here is fatal: the process has nothing to
/// serve without its store, so the error propagates up to `main`.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await?;

    tracing::info!("Database connection pool ready");

    Ok(pool)
}
