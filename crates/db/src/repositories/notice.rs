//! Notice repository: society announcements.

use chrono::{NaiveDate, Utc};
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{notices, societies};
use crate::soft_delete::find_active;

/// Error types for notice operations.
#[derive(Debug, thiserror::Error)]
pub enum NoticeError {
    /// Notice not found.
    #[error("Notice not found: {0}")]
    NotFound(Uuid),

    /// Parent society not found.
    #[error("Society not found: {0}")]
    SocietyNotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for publishing a notice.
#[derive(Debug, Clone)]
pub struct CreateNoticeInput {
    /// Society the notice addresses.
    pub society_id: Uuid,
    /// Headline.
    pub title: String,
    /// Notice body.
    pub body: String,
    /// First day the notice is visible.
    pub starts_on: NaiveDate,
    /// Last day the notice is visible, if it expires.
    pub ends_on: Option<NaiveDate>,
    /// User publishing the notice.
    pub created_by: Uuid,
}

/// Input for editing a notice.
#[derive(Debug, Clone, Default)]
pub struct UpdateNoticeInput {
    /// New headline.
    pub title: Option<String>,
    /// New body.
    pub body: Option<String>,
    /// New visibility start.
    pub starts_on: Option<NaiveDate>,
    /// New visibility end; `Some(None)` clears it.
    pub ends_on: Option<Option<NaiveDate>>,
}

/// Notice repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct NoticeRepository {
    db: Arc<DatabaseConnection>,
}

impl NoticeRepository {
    /// Creates a new notice repository.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Publishes a notice.
    ///
    /// # Errors
    ///
    /// Returns an error if the society does not exist or the insert fails.
    pub async fn create(&self, input: CreateNoticeInput) -> Result<notices::Model, NoticeError> {
        let _society = find_active::<societies::Entity>()
            .filter(societies::Column::Id.eq(input.society_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(NoticeError::SocietyNotFound(input.society_id))?;

        let now = Utc::now().into();
        let notice = notices::ActiveModel {
            id: Set(Uuid::new_v4()),
            society_id: Set(input.society_id),
            title: Set(input.title),
            body: Set(input.body),
            starts_on: Set(input.starts_on),
            ends_on: Set(input.ends_on),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
            is_deleted: Set(false),
            deleted_at: Set(None),
            deleted_by: Set(None),
        };

        Ok(notice.insert(self.db.as_ref()).await?)
    }

    /// Gets a notice by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the notice is not found or the query fails.
    pub async fn get(&self, notice_id: Uuid) -> Result<notices::Model, NoticeError> {
        find_active::<notices::Entity>()
            .filter(notices::Column::Id.eq(notice_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(NoticeError::NotFound(notice_id))
    }

    /// Lists a society's notices, newest start date first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_by_society(&self, society_id: Uuid) -> Result<Vec<notices::Model>, NoticeError> {
        Ok(find_active::<notices::Entity>()
            .filter(notices::Column::SocietyId.eq(society_id))
            .order_by_desc(notices::Column::StartsOn)
            .order_by_desc(notices::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?)
    }

    /// Edits a notice.
    ///
    /// # Errors
    ///
    /// Returns an error if the notice is not found or the update fails.
    pub async fn update(
        &self,
        notice_id: Uuid,
        input: UpdateNoticeInput,
        updated_by: Uuid,
    ) -> Result<notices::Model, NoticeError> {
        let notice = self.get(notice_id).await?;

        let mut active: notices::ActiveModel = notice.into();
        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(body) = input.body {
            active.body = Set(body);
        }
        if let Some(starts_on) = input.starts_on {
            active.starts_on = Set(starts_on);
        }
        if let Some(ends_on) = input.ends_on {
            active.ends_on = Set(ends_on);
        }
        active.updated_by = Set(Some(updated_by));
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Soft-deletes a notice.
    ///
    /// # Errors
    ///
    /// Returns an error if the notice is not found or the update fails.
    pub async fn delete(&self, notice_id: Uuid, deleted_by: Uuid) -> Result<(), NoticeError> {
        let notice = self.get(notice_id).await?;
        let now = Utc::now().into();

        let mut active: notices::ActiveModel = notice.into();
        active.is_deleted = Set(true);
        active.deleted_at = Set(Some(now));
        active.deleted_by = Set(Some(deleted_by));
        active.updated_at = Set(now);
        active.update(self.db.as_ref()).await?;

        Ok(())
    }
}
