//! Society repository: tenant-root registry operations.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, ModelTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{buildings, societies};
use crate::soft_delete::find_active;

/// Error types for society operations.
#[derive(Debug, thiserror::Error)]
pub enum SocietyError {
    /// Society not found.
    #[error("Society not found: {0}")]
    NotFound(Uuid),

    /// Society name already taken.
    #[error("Society name already exists")]
    DuplicateName,

    /// Society still has buildings referencing it.
    #[error("Society still has buildings and cannot be deleted")]
    HasBuildings,

    /// Unknown society type string.
    #[error("Invalid society type: {0}")]
    InvalidSocietyType(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a society.
#[derive(Debug, Clone)]
pub struct CreateSocietyInput {
    /// Society name; unique among non-deleted societies.
    pub name: String,
    /// Street address.
    pub address: String,
    /// City.
    pub city: String,
    /// State.
    pub state: String,
    /// Country.
    pub country: String,
    /// residential | commercial | housing.
    pub society_type: String,
    /// Opening balance carried in from outside the system.
    pub opening_balance: Decimal,
    /// User creating the society.
    pub created_by: Uuid,
}

/// Input for updating a society. `end_date` has its own operation because it
/// is gated to super_admin.
#[derive(Debug, Clone, Default)]
pub struct UpdateSocietyInput {
    /// New name.
    pub name: Option<String>,
    /// New address.
    pub address: Option<String>,
    /// New city.
    pub city: Option<String>,
    /// New state.
    pub state: Option<String>,
    /// New country.
    pub country: Option<String>,
    /// New opening balance.
    pub opening_balance: Option<Decimal>,
}

/// Society repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct SocietyRepository {
    db: Arc<DatabaseConnection>,
}

impl SocietyRepository {
    /// Creates a new society repository.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Creates a society.
    ///
    /// # Errors
    ///
    /// Returns an error if the society type is unknown, the name is already
    /// taken, or the database operation fails.
    pub async fn create(&self, input: CreateSocietyInput) -> Result<societies::Model, SocietyError> {
        if strata_shared::SocietyType::parse(&input.society_type).is_none() {
            return Err(SocietyError::InvalidSocietyType(input.society_type));
        }

        let existing = find_active::<societies::Entity>()
            .filter(societies::Column::Name.eq(&input.name))
            .one(self.db.as_ref())
            .await?;
        if existing.is_some() {
            return Err(SocietyError::DuplicateName);
        }

        let now = Utc::now().into();
        let society = societies::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(input.name),
            address: Set(input.address),
            city: Set(input.city),
            state: Set(input.state),
            country: Set(input.country),
            society_type: Set(input.society_type),
            end_date: Set(None),
            opening_balance: Set(input.opening_balance),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
            is_deleted: Set(false),
            deleted_at: Set(None),
            deleted_by: Set(None),
        };

        Ok(society.insert(self.db.as_ref()).await?)
    }

    /// Gets a society by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the society is not found or the query fails.
    pub async fn get(&self, society_id: Uuid) -> Result<societies::Model, SocietyError> {
        find_active::<societies::Entity>()
            .filter(societies::Column::Id.eq(society_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(SocietyError::NotFound(society_id))
    }

    /// Lists all non-deleted societies, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list(&self) -> Result<Vec<societies::Model>, SocietyError> {
        Ok(find_active::<societies::Entity>()
            .order_by_desc(societies::Column::CreatedAt)
            .all(self.db.as_ref())
            .await?)
    }

    /// Updates a society's profile fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the society is not found, the new name collides,
    /// or the database operation fails.
    pub async fn update(
        &self,
        society_id: Uuid,
        input: UpdateSocietyInput,
        updated_by: Uuid,
    ) -> Result<societies::Model, SocietyError> {
        let society = self.get(society_id).await?;

        if let Some(name) = &input.name {
            let duplicate = find_active::<societies::Entity>()
                .filter(societies::Column::Name.eq(name))
                .filter(societies::Column::Id.ne(society_id))
                .one(self.db.as_ref())
                .await?;
            if duplicate.is_some() {
                return Err(SocietyError::DuplicateName);
            }
        }

        let mut active: societies::ActiveModel = society.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(address) = input.address {
            active.address = Set(address);
        }
        if let Some(city) = input.city {
            active.city = Set(city);
        }
        if let Some(state) = input.state {
            active.state = Set(state);
        }
        if let Some(country) = input.country {
            active.country = Set(country);
        }
        if let Some(opening_balance) = input.opening_balance {
            active.opening_balance = Set(opening_balance);
        }
        active.updated_by = Set(Some(updated_by));
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Sets the subscription end date. Role gating (super_admin only) happens
    /// at the route layer.
    ///
    /// # Errors
    ///
    /// Returns an error if the society is not found or the update fails.
    pub async fn set_end_date(
        &self,
        society_id: Uuid,
        end_date: NaiveDate,
        updated_by: Uuid,
    ) -> Result<societies::Model, SocietyError> {
        let society = self.get(society_id).await?;

        let mut active: societies::ActiveModel = society.into();
        active.end_date = Set(Some(end_date));
        active.updated_by = Set(Some(updated_by));
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Hard-deletes a society once no non-deleted buildings reference it.
    ///
    /// This is the one legacy physical delete in the system; everything else
    /// is soft-deleted.
    ///
    /// # Errors
    ///
    /// Returns an error if the society is not found, still has buildings, or
    /// the delete fails.
    pub async fn delete(&self, society_id: Uuid) -> Result<(), SocietyError> {
        let society = self.get(society_id).await?;

        let building_count = find_active::<buildings::Entity>()
            .filter(buildings::Column::SocietyId.eq(society_id))
            .count(self.db.as_ref())
            .await?;
        if building_count > 0 {
            return Err(SocietyError::HasBuildings);
        }

        society.delete(self.db.as_ref()).await?;
        Ok(())
    }
}
