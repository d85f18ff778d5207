//! Building repository.

use chrono::Utc;
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::{buildings, societies};
use crate::soft_delete::find_active;

/// Error types for building operations.
#[derive(Debug, thiserror::Error)]
pub enum BuildingError {
    /// Building not found.
    #[error("Building not found: {0}")]
    NotFound(Uuid),

    /// Parent society not found.
    #[error("Society not found: {0}")]
    SocietyNotFound(Uuid),

    /// Floor count below 1.
    #[error("Total floors must be at least 1")]
    InvalidFloors,

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a building.
#[derive(Debug, Clone)]
pub struct CreateBuildingInput {
    /// Parent society.
    pub society_id: Uuid,
    /// Building name.
    pub name: String,
    /// Number of floors; flats validate their floor against this.
    pub total_floors: i32,
    /// User creating the building.
    pub created_by: Uuid,
}

/// Input for updating a building.
#[derive(Debug, Clone, Default)]
pub struct UpdateBuildingInput {
    /// New name.
    pub name: Option<String>,
    /// New floor count.
    pub total_floors: Option<i32>,
}

/// Building repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct BuildingRepository {
    db: Arc<DatabaseConnection>,
}

impl BuildingRepository {
    /// Creates a new building repository.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Creates a building inside a society.
    ///
    /// # Errors
    ///
    /// Returns an error if the society does not exist, the floor count is
    /// invalid, or the insert fails.
    pub async fn create(&self, input: CreateBuildingInput) -> Result<buildings::Model, BuildingError> {
        if input.total_floors < 1 {
            return Err(BuildingError::InvalidFloors);
        }

        let _society = find_active::<societies::Entity>()
            .filter(societies::Column::Id.eq(input.society_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(BuildingError::SocietyNotFound(input.society_id))?;

        let now = Utc::now().into();
        let building = buildings::ActiveModel {
            id: Set(Uuid::new_v4()),
            society_id: Set(input.society_id),
            name: Set(input.name),
            total_floors: Set(input.total_floors),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
            is_deleted: Set(false),
            deleted_at: Set(None),
            deleted_by: Set(None),
        };

        Ok(building.insert(self.db.as_ref()).await?)
    }

    /// Gets a building by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the building is not found or the query fails.
    pub async fn get(&self, building_id: Uuid) -> Result<buildings::Model, BuildingError> {
        find_active::<buildings::Entity>()
            .filter(buildings::Column::Id.eq(building_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(BuildingError::NotFound(building_id))
    }

    /// Lists buildings of a society.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_by_society(
        &self,
        society_id: Uuid,
    ) -> Result<Vec<buildings::Model>, BuildingError> {
        Ok(find_active::<buildings::Entity>()
            .filter(buildings::Column::SocietyId.eq(society_id))
            .order_by_asc(buildings::Column::Name)
            .all(self.db.as_ref())
            .await?)
    }

    /// Updates a building.
    ///
    /// # Errors
    ///
    /// Returns an error if the building is not found, the floor count is
    /// invalid, or the update fails.
    pub async fn update(
        &self,
        building_id: Uuid,
        input: UpdateBuildingInput,
        updated_by: Uuid,
    ) -> Result<buildings::Model, BuildingError> {
        if matches!(input.total_floors, Some(floors) if floors < 1) {
            return Err(BuildingError::InvalidFloors);
        }

        let building = self.get(building_id).await?;

        let mut active: buildings::ActiveModel = building.into();
        if let Some(name) = input.name {
            active.name = Set(name);
        }
        if let Some(total_floors) = input.total_floors {
            active.total_floors = Set(total_floors);
        }
        active.updated_by = Set(Some(updated_by));
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Soft-deletes a building.
    ///
    /// # Errors
    ///
    /// Returns an error if the building is not found or the update fails.
    pub async fn delete(&self, building_id: Uuid, deleted_by: Uuid) -> Result<(), BuildingError> {
        let building = self.get(building_id).await?;
        let now = Utc::now().into();

        let mut active: buildings::ActiveModel = building.into();
        active.is_deleted = Set(true);
        active.deleted_at = Set(Some(now));
        active.deleted_by = Set(Some(deleted_by));
        active.updated_at = Set(now);
        active.update(self.db.as_ref()).await?;

        Ok(())
    }
}
