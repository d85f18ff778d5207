//! Poll repository: polls, options, votes, and derived results.
//!
//! A poll and its options insert in one transaction. Results are computed at
//! read time from vote rows via [`strata_core::poll::compute_results`], never
//! stored. Deleting a poll cascades the soft delete to options and votes.

use chrono::{DateTime, FixedOffset, Utc};
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
    sea_query::Expr,
};
use strata_core::poll::{self, OptionTally, PollResults, PollStatus};
use uuid::Uuid;

use crate::entities::{poll_options, poll_votes, polls, societies};
use crate::soft_delete::find_active;

/// Error types for poll operations.
#[derive(Debug, thiserror::Error)]
pub enum PollError {
    /// Poll not found.
    #[error("Poll not found: {0}")]
    NotFound(Uuid),

    /// Option not found under this poll.
    #[error("Poll option not found: {0}")]
    OptionNotFound(Uuid),

    /// Parent society not found.
    #[error("Society not found: {0}")]
    SocietyNotFound(Uuid),

    /// A poll needs at least two options.
    #[error("A poll needs at least two options")]
    TooFewOptions,

    /// Poll expiry has passed.
    #[error("Poll has expired")]
    Expired,

    /// User has already voted on this poll.
    #[error("User has already voted on this poll")]
    AlreadyVoted,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a poll with its options.
#[derive(Debug, Clone)]
pub struct CreatePollInput {
    /// Society running the poll.
    pub society_id: Uuid,
    /// Question shown to voters.
    pub question: String,
    /// Option labels, at least two.
    pub options: Vec<String>,
    /// Instant after which votes are rejected.
    pub expires_at: DateTime<FixedOffset>,
    /// User creating the poll.
    pub created_by: Uuid,
}

/// A poll with its options, derived status, and computed results.
#[derive(Debug, Clone)]
pub struct PollWithResults {
    /// Poll record.
    pub poll: polls::Model,
    /// Option rows in creation order.
    pub options: Vec<poll_options::Model>,
    /// Lifecycle state at read time.
    pub status: PollStatus,
    /// Vote counts and percentages.
    pub results: PollResults,
}

/// Poll repository.
#[derive(Debug, Clone)]
pub struct PollRepository {
    db: Arc<DatabaseConnection>,
}

impl PollRepository {
    /// Creates a new poll repository.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Creates a poll and its options in one transaction.
    ///
    /// # Errors
    ///
    /// Returns an error if the society is unknown, fewer than two options
    /// are given, or a write fails.
    pub async fn create(&self, input: CreatePollInput) -> Result<PollWithResults, PollError> {
        if input.options.len() < 2 {
            return Err(PollError::TooFewOptions);
        }

        let _society = find_active::<societies::Entity>()
            .filter(societies::Column::Id.eq(input.society_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(PollError::SocietyNotFound(input.society_id))?;

        let txn = self.db.begin().await?;
        let now = Utc::now().into();

        let poll = polls::ActiveModel {
            id: Set(Uuid::new_v4()),
            society_id: Set(input.society_id),
            question: Set(input.question),
            expires_at: Set(input.expires_at),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
            is_deleted: Set(false),
            deleted_at: Set(None),
            deleted_by: Set(None),
        };
        let poll = poll.insert(&txn).await?;

        let mut options = Vec::with_capacity(input.options.len());
        for label in input.options {
            let option = poll_options::ActiveModel {
                id: Set(Uuid::new_v4()),
                poll_id: Set(poll.id),
                label: Set(label),
                created_by: Set(input.created_by),
                created_at: Set(now),
                updated_by: Set(None),
                updated_at: Set(now),
                is_deleted: Set(false),
                deleted_at: Set(None),
                deleted_by: Set(None),
            };
            options.push(option.insert(&txn).await?);
        }

        txn.commit().await?;

        let status = PollStatus::at(poll.expires_at.with_timezone(&Utc), Utc::now());
        let tallies: Vec<OptionTally> = options
            .iter()
            .map(|o| OptionTally {
                option_id: o.id,
                votes: 0,
            })
            .collect();
        let results = poll::compute_results(&tallies);

        Ok(PollWithResults {
            poll,
            options,
            status,
            results,
        })
    }

    /// Gets a poll with options, status, and results computed from votes.
    ///
    /// # Errors
    ///
    /// Returns an error if the poll is not found or a query fails.
    pub async fn get_with_results(&self, poll_id: Uuid) -> Result<PollWithResults, PollError> {
        let poll = self.get(poll_id).await?;
        self.with_results(poll).await
    }

    /// Lists a society's polls with results, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if a query fails.
    pub async fn list_by_society(
        &self,
        society_id: Uuid,
    ) -> Result<Vec<PollWithResults>, PollError> {
        let rows = find_active::<polls::Entity>()
            .filter(polls::Column::SocietyId.eq(society_id))
            .order_by_desc(polls::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        let mut result = Vec::with_capacity(rows.len());
        for poll in rows {
            result.push(self.with_results(poll).await?);
        }
        Ok(result)
    }

    /// Casts a vote.
    ///
    /// Votes are final: one per user per poll, no changes, rejected after
    /// expiry. Expiry is checked against the clock at request time.
    ///
    /// # Errors
    ///
    /// Returns an error if the poll or option is unknown, the poll has
    /// expired, the user has already voted, or the insert fails.
    pub async fn vote(
        &self,
        poll_id: Uuid,
        option_id: Uuid,
        user_id: Uuid,
    ) -> Result<poll_votes::Model, PollError> {
        let poll = self.get(poll_id).await?;

        if PollStatus::at(poll.expires_at.with_timezone(&Utc), Utc::now()) == PollStatus::Expired {
            return Err(PollError::Expired);
        }

        let option = find_active::<poll_options::Entity>()
            .filter(poll_options::Column::Id.eq(option_id))
            .filter(poll_options::Column::PollId.eq(poll_id))
            .one(self.db.as_ref())
            .await?;
        if option.is_none() {
            return Err(PollError::OptionNotFound(option_id));
        }

        let already = find_active::<poll_votes::Entity>()
            .filter(poll_votes::Column::PollId.eq(poll_id))
            .filter(poll_votes::Column::UserId.eq(user_id))
            .count(self.db.as_ref())
            .await?;
        if already > 0 {
            return Err(PollError::AlreadyVoted);
        }

        let now = Utc::now().into();
        let vote = poll_votes::ActiveModel {
            id: Set(Uuid::new_v4()),
            poll_id: Set(poll_id),
            option_id: Set(option_id),
            user_id: Set(user_id),
            created_by: Set(user_id),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
            is_deleted: Set(false),
            deleted_at: Set(None),
            deleted_by: Set(None),
        };

        // The partial unique index on (poll_id, user_id) backs the
        // already-voted check under concurrent requests.
        Ok(vote.insert(self.db.as_ref()).await?)
    }

    /// Soft-deletes a poll and cascades to its options and votes.
    ///
    /// # Errors
    ///
    /// Returns an error if the poll is not found or a write fails.
    pub async fn delete(&self, poll_id: Uuid, deleted_by: Uuid) -> Result<(), PollError> {
        let poll = self.get(poll_id).await?;

        let txn = self.db.begin().await?;
        let now = Utc::now();

        let mut active: polls::ActiveModel = poll.into();
        active.is_deleted = Set(true);
        active.deleted_at = Set(Some(now.into()));
        active.deleted_by = Set(Some(deleted_by));
        active.updated_at = Set(now.into());
        active.update(&txn).await?;

        poll_options::Entity::update_many()
            .col_expr(poll_options::Column::IsDeleted, Expr::value(true))
            .col_expr(poll_options::Column::DeletedAt, Expr::value(Some(now)))
            .col_expr(poll_options::Column::DeletedBy, Expr::value(Some(deleted_by)))
            .filter(poll_options::Column::PollId.eq(poll_id))
            .filter(poll_options::Column::IsDeleted.eq(false))
            .exec(&txn)
            .await?;

        poll_votes::Entity::update_many()
            .col_expr(poll_votes::Column::IsDeleted, Expr::value(true))
            .col_expr(poll_votes::Column::DeletedAt, Expr::value(Some(now)))
            .col_expr(poll_votes::Column::DeletedBy, Expr::value(Some(deleted_by)))
            .filter(poll_votes::Column::PollId.eq(poll_id))
            .filter(poll_votes::Column::IsDeleted.eq(false))
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }

    async fn get(&self, poll_id: Uuid) -> Result<polls::Model, PollError> {
        find_active::<polls::Entity>()
            .filter(polls::Column::Id.eq(poll_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(PollError::NotFound(poll_id))
    }

    async fn with_results(&self, poll: polls::Model) -> Result<PollWithResults, PollError> {
        let options = find_active::<poll_options::Entity>()
            .filter(poll_options::Column::PollId.eq(poll.id))
            .order_by_asc(poll_options::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?;

        let mut tallies = Vec::with_capacity(options.len());
        for option in &options {
            let votes = find_active::<poll_votes::Entity>()
                .filter(poll_votes::Column::OptionId.eq(option.id))
                .count(self.db.as_ref())
                .await?;
            tallies.push(OptionTally {
                option_id: option.id,
                votes,
            });
        }

        let status = PollStatus::at(poll.expires_at.with_timezone(&Utc), Utc::now());
        let results = poll::compute_results(&tallies);

        Ok(PollWithResults {
            poll,
            options,
            status,
            results,
        })
    }
}
