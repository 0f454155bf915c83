use std::sync::Arc;

use uuid::Uuid;

use crate::db::ListRepository;
use crate::error::{AppError, AppResult};
use crate::models::{list::validate_list_name, List, ListType, MovieItem, NewList};

/// Business rules for user lists
///
/// Default lists (watchlist, liked, rated) are immutable containers:
/// they cannot be renamed or deleted, and exist at most once per user.
#[derive(Clone)]
pub struct ListService {
    lists: Arc<dyn ListRepository>,
}

impl ListService {
    pub fn new(lists: Arc<dyn ListRepository>) -> Self {
        Self { lists }
    }

    pub async fn all(&self, user_id: Uuid) -> AppResult<Vec<List>> {
        self.lists.find_all(user_id).await
    }

    pub async fn get(&self, user_id: Uuid, list_id: Uuid) -> AppResult<List> {
        self.lists
            .find_by_id(user_id, list_id)
            .await?
            .ok_or_else(|| AppError::NotFound("No list found with that ID".to_string()))
    }

    pub async fn create(&self, user_id: Uuid, raw_name: &str) -> AppResult<List> {
        let name = validate_list_name(raw_name)?;

        if self.lists.find_by_name(user_id, &name).await?.is_some() {
            return Err(AppError::Conflict(
                "A list with this name already exists".to_string(),
            ));
        }

        let list = self.lists.insert(NewList::custom(user_id, name)).await?;

        tracing::info!(user_id = %user_id, list_id = %list.id, "List created");

        Ok(list)
    }

    pub async fn rename(&self, user_id: Uuid, list_id: Uuid, raw_name: &str) -> AppResult<List> {
        let name = validate_list_name(raw_name)?;
        let list = self.get(user_id, list_id).await?;

        if list.is_default {
            return Err(AppError::Conflict("Cannot rename default lists".to_string()));
        }

        if let Some(existing) = self.lists.find_by_name(user_id, &name).await? {
            if existing.id != list_id {
                return Err(AppError::Conflict(
                    "A list with this name already exists".to_string(),
                ));
            }
        }

        self.lists.rename(list_id, &name).await?;
        self.get(user_id, list_id).await
    }

    pub async fn delete(&self, user_id: Uuid, list_id: Uuid) -> AppResult<()> {
        let list = self.get(user_id, list_id).await?;

        if list.is_default {
            return Err(AppError::Conflict("Cannot delete default lists".to_string()));
        }

        self.lists.delete(list_id).await?;

        tracing::info!(user_id = %user_id, list_id = %list_id, "List deleted");

        Ok(())
    }

    pub async fn add_movie(&self, user_id: Uuid, list_id: Uuid, item: MovieItem) -> AppResult<List> {
        if item.movie_id <= 0 || item.title.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "Movie ID and title are required".to_string(),
            ));
        }

        let list = self.get(user_id, list_id).await?;
        if list.contains(item.movie_id) {
            return Err(AppError::Conflict(
                "Movie already exists in this list".to_string(),
            ));
        }

        self.lists.add_item(list_id, &item).await?;
        self.get(user_id, list_id).await
    }

    /// Removing an absent movie is a no-op, not an error
    pub async fn remove_movie(
        &self,
        user_id: Uuid,
        list_id: Uuid,
        movie_id: i64,
    ) -> AppResult<List> {
        let list = self.get(user_id, list_id).await?;
        self.lists.remove_item(list.id, movie_id).await?;
        self.get(user_id, list_id).await
    }

    /// Quick access to a default list, creating it on first use.
    ///
    /// Concurrent first-time calls race on the insert; the partial unique
    /// index on (user, type) breaks the tie and the loser re-reads the
    /// winner's row.
    pub async fn get_by_type(&self, user_id: Uuid, list_type: ListType) -> AppResult<List> {
        if list_type.default_name().is_none() {
            return Err(AppError::InvalidInput("Invalid list type".to_string()));
        }

        if let Some(list) = self.lists.find_by_type(user_id, list_type).await? {
            return Ok(list);
        }

        match self
            .lists
            .insert(NewList::default_of(user_id, list_type))
            .await
        {
            Ok(list) => Ok(list),
            Err(AppError::Conflict(_)) => self
                .lists
                .find_by_type(user_id, list_type)
                .await?
                .ok_or_else(|| {
                    AppError::Internal("Default list missing after insert conflict".to_string())
                }),
            Err(e) => Err(e),
        }
    }

    /// Lookup without the create-on-demand behavior
    pub async fn try_get_by_type(
        &self,
        user_id: Uuid,
        list_type: ListType,
    ) -> AppResult<Option<List>> {
        self.lists.find_by_type(user_id, list_type).await
    }

    /// Creates the three default lists for a user. Idempotent: repeated
    /// calls (and concurrent signups) leave exactly one of each.
    pub async fn ensure_default_lists(&self, user_id: Uuid) -> AppResult<()> {
        if !self.lists.find_defaults(user_id).await?.is_empty() {
            return Ok(());
        }

        for list_type in ListType::DEFAULTS {
            match self
                .lists
                .insert(NewList::default_of(user_id, list_type))
                .await
            {
                Ok(_) => {}
                Err(AppError::Conflict(_)) => {}
                Err(e) => return Err(e),
            }
        }

        tracing::info!(user_id = %user_id, "Default lists created");

        Ok(())
    }
}
