use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::models::{List, ListType, MovieItem, NewList};

/// Store operations for lists
///
/// Implementations surface uniqueness-constraint violations as
/// [`AppError::Conflict`]; callers use that as the tie-breaker for
/// concurrent get-or-create races.
#[async_trait]
pub trait ListRepository: Send + Sync {
    /// All lists for a user, default lists first, then newest first
    async fn find_all(&self, user_id: Uuid) -> AppResult<Vec<List>>;

    async fn find_by_id(&self, user_id: Uuid, list_id: Uuid) -> AppResult<Option<List>>;

    /// Lookup by exact (already trimmed) name
    async fn find_by_name(&self, user_id: Uuid, name: &str) -> AppResult<Option<List>>;

    async fn find_by_type(&self, user_id: Uuid, list_type: ListType) -> AppResult<Option<List>>;

    async fn find_defaults(&self, user_id: Uuid) -> AppResult<Vec<List>>;

    async fn insert(&self, list: NewList) -> AppResult<List>;

    async fn rename(&self, list_id: Uuid, name: &str) -> AppResult<()>;

    async fn delete(&self, list_id: Uuid) -> AppResult<()>;

    async fn add_item(&self, list_id: Uuid, item: &MovieItem) -> AppResult<()>;

    /// Removes by movie id; absence is not an error
    async fn remove_item(&self, list_id: Uuid, movie_id: i64) -> AppResult<()>;
}

const LIST_COLUMNS: &str = "id, user_id, name, is_default, list_type, created_at, updated_at";

#[derive(FromRow)]
struct ListRow {
    id: Uuid,
    user_id: Uuid,
    name: String,
    is_default: bool,
    list_type: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ListRow {
    fn into_list(self, movies: Vec<MovieItem>) -> AppResult<List> {
        let list_type: ListType = self
            .list_type
            .parse()
            .map_err(|_| AppError::Internal(format!("Unknown list type \"{}\"", self.list_type)))?;

        Ok(List {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            is_default: self.is_default,
            list_type,
            movies,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(FromRow)]
struct ItemRow {
    movie_id: i64,
    title: String,
    poster_path: Option<String>,
    release_date: Option<String>,
    added_at: DateTime<Utc>,
}

impl From<ItemRow> for MovieItem {
    fn from(row: ItemRow) -> Self {
        MovieItem {
            movie_id: row.movie_id,
            title: row.title,
            poster_path: row.poster_path,
            release_date: row.release_date,
            added_at: row.added_at,
        }
    }
}

#[derive(Clone)]
pub struct PgListRepository {
    pool: PgPool,
}

impl PgListRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn load_items(&self, list_id: Uuid) -> AppResult<Vec<MovieItem>> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            "SELECT movie_id, title, poster_path, release_date, added_at \
             FROM list_items WHERE list_id = $1 ORDER BY added_at, movie_id",
        )
        .bind(list_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(MovieItem::from).collect())
    }

    async fn hydrate(&self, row: ListRow) -> AppResult<List> {
        let movies = self.load_items(row.id).await?;
        row.into_list(movies)
    }

    async fn hydrate_all(&self, rows: Vec<ListRow>) -> AppResult<Vec<List>> {
        let mut lists = Vec::with_capacity(rows.len());
        for row in rows {
            lists.push(self.hydrate(row).await?);
        }
        Ok(lists)
    }

    fn map_list_conflict(err: sqlx::Error) -> AppError {
        if is_unique_violation(&err) {
            return AppError::Conflict("A list with this name already exists".to_string());
        }
        err.into()
    }
}

#[async_trait]
impl ListRepository for PgListRepository {
    async fn find_all(&self, user_id: Uuid) -> AppResult<Vec<List>> {
        let rows: Vec<ListRow> = sqlx::query_as(&format!(
            "SELECT {} FROM lists WHERE user_id = $1 ORDER BY is_default DESC, created_at DESC",
            LIST_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        self.hydrate_all(rows).await
    }

    async fn find_by_id(&self, user_id: Uuid, list_id: Uuid) -> AppResult<Option<List>> {
        let row: Option<ListRow> = sqlx::query_as(&format!(
            "SELECT {} FROM lists WHERE id = $1 AND user_id = $2",
            LIST_COLUMNS
        ))
        .bind(list_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_name(&self, user_id: Uuid, name: &str) -> AppResult<Option<List>> {
        let row: Option<ListRow> = sqlx::query_as(&format!(
            "SELECT {} FROM lists WHERE user_id = $1 AND name = $2",
            LIST_COLUMNS
        ))
        .bind(user_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_by_type(&self, user_id: Uuid, list_type: ListType) -> AppResult<Option<List>> {
        let row: Option<ListRow> = sqlx::query_as(&format!(
            "SELECT {} FROM lists WHERE user_id = $1 AND list_type = $2 AND is_default",
            LIST_COLUMNS
        ))
        .bind(user_id)
        .bind(list_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn find_defaults(&self, user_id: Uuid) -> AppResult<Vec<List>> {
        let rows: Vec<ListRow> = sqlx::query_as(&format!(
            "SELECT {} FROM lists WHERE user_id = $1 AND is_default",
            LIST_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        self.hydrate_all(rows).await
    }

    async fn insert(&self, list: NewList) -> AppResult<List> {
        let row: ListRow = sqlx::query_as(&format!(
            "INSERT INTO lists (user_id, name, is_default, list_type) \
             VALUES ($1, $2, $3, $4) RETURNING {}",
            LIST_COLUMNS
        ))
        .bind(list.user_id)
        .bind(&list.name)
        .bind(list.is_default)
        .bind(list.list_type.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(Self::map_list_conflict)?;

        row.into_list(Vec::new())
    }

    async fn rename(&self, list_id: Uuid, name: &str) -> AppResult<()> {
        sqlx::query("UPDATE lists SET name = $2, updated_at = now() WHERE id = $1")
            .bind(list_id)
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(Self::map_list_conflict)?;

        Ok(())
    }

    async fn delete(&self, list_id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM lists WHERE id = $1")
            .bind(list_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn add_item(&self, list_id: Uuid, item: &MovieItem) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO list_items (list_id, movie_id, title, poster_path, release_date, added_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(list_id)
        .bind(item.movie_id)
        .bind(&item.title)
        .bind(&item.poster_path)
        .bind(&item.release_date)
        .bind(item.added_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("Movie already exists in this list".to_string())
            } else {
                e.into()
            }
        })?;

        sqlx::query("UPDATE lists SET updated_at = now() WHERE id = $1")
            .bind(list_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn remove_item(&self, list_id: Uuid, movie_id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM list_items WHERE list_id = $1 AND movie_id = $2")
            .bind(list_id)
            .bind(movie_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
