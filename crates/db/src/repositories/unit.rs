//! Unit repository: flats and housing units behind one interface.
//!
//! The two table families stay separate in persistence, but callers address
//! a unit through [`UnitRef`] so the dues and penalty logic is written once.

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, QueryFilter, QueryOrder, Set,
};
use strata_shared::UnitKind;
use uuid::Uuid;

use crate::entities::{buildings, flats, housing_units, societies};
use crate::soft_delete::find_active;

/// Error types for unit operations.
#[derive(Debug, thiserror::Error)]
pub enum UnitError {
    /// Flat or housing unit not found.
    #[error("Unit not found: {0}")]
    NotFound(Uuid),

    /// Parent building not found.
    #[error("Building not found: {0}")]
    BuildingNotFound(Uuid),

    /// Parent society not found.
    #[error("Society not found: {0}")]
    SocietyNotFound(Uuid),

    /// Floor number beyond the building's floor count.
    #[error("Floor {floor} exceeds building total of {total}")]
    FloorOutOfRange {
        /// Requested floor.
        floor: i32,
        /// Building's total floors.
        total: i32,
    },

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Reference to a billable unit of either family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitRef {
    /// Which table family the id belongs to.
    pub kind: UnitKind,
    /// Row id in that family.
    pub id: Uuid,
}

/// Input for creating a flat.
#[derive(Debug, Clone)]
pub struct CreateFlatInput {
    /// Parent building.
    pub building_id: Uuid,
    /// Display number, e.g. "A-304".
    pub flat_number: String,
    /// Floor; must not exceed the building's total floors.
    pub floor_number: i32,
    /// Area in square feet.
    pub square_foot: Option<Decimal>,
    /// User creating the flat.
    pub created_by: Uuid,
}

/// Input for updating a flat.
#[derive(Debug, Clone, Default)]
pub struct UpdateFlatInput {
    /// New display number.
    pub flat_number: Option<String>,
    /// New floor; validated against the building's total floors.
    pub floor_number: Option<i32>,
    /// New area in square feet.
    pub square_foot: Option<Decimal>,
}

/// Input for creating a housing unit.
#[derive(Debug, Clone)]
pub struct CreateHousingUnitInput {
    /// Parent society (housing societies have no buildings).
    pub society_id: Uuid,
    /// Display number.
    pub unit_number: String,
    /// Area in square feet.
    pub square_foot: Option<Decimal>,
    /// User creating the unit.
    pub created_by: Uuid,
}

/// Input for updating a housing unit.
#[derive(Debug, Clone, Default)]
pub struct UpdateHousingUnitInput {
    /// New display number.
    pub unit_number: Option<String>,
    /// New area in square feet.
    pub square_foot: Option<Decimal>,
}

/// Unit repository for flats and housing units.
#[derive(Debug, Clone)]
pub struct UnitRepository {
    db: Arc<DatabaseConnection>,
}

impl UnitRepository {
    /// Creates a new unit repository.
    #[must_use]
    pub fn new(db: impl Into<Arc<DatabaseConnection>>) -> Self {
        Self { db: db.into() }
    }

    /// Creates a flat, enforcing the floor-number invariant.
    ///
    /// # Errors
    ///
    /// Returns an error if the building does not exist, the floor exceeds
    /// the building's total, or the insert fails.
    pub async fn create_flat(&self, input: CreateFlatInput) -> Result<flats::Model, UnitError> {
        let building = find_active::<buildings::Entity>()
            .filter(buildings::Column::Id.eq(input.building_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(UnitError::BuildingNotFound(input.building_id))?;

        if input.floor_number > building.total_floors {
            return Err(UnitError::FloorOutOfRange {
                floor: input.floor_number,
                total: building.total_floors,
            });
        }

        let now = Utc::now().into();
        let flat = flats::ActiveModel {
            id: Set(Uuid::new_v4()),
            building_id: Set(input.building_id),
            flat_number: Set(input.flat_number),
            floor_number: Set(input.floor_number),
            square_foot: Set(input.square_foot),
            is_occupied: Set(false),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
            is_deleted: Set(false),
            deleted_at: Set(None),
            deleted_by: Set(None),
        };

        Ok(flat.insert(self.db.as_ref()).await?)
    }

    /// Creates a housing unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the society does not exist or the insert fails.
    pub async fn create_housing_unit(
        &self,
        input: CreateHousingUnitInput,
    ) -> Result<housing_units::Model, UnitError> {
        let _society = find_active::<societies::Entity>()
            .filter(societies::Column::Id.eq(input.society_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(UnitError::SocietyNotFound(input.society_id))?;

        let now = Utc::now().into();
        let unit = housing_units::ActiveModel {
            id: Set(Uuid::new_v4()),
            society_id: Set(input.society_id),
            unit_number: Set(input.unit_number),
            square_foot: Set(input.square_foot),
            is_occupied: Set(false),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_by: Set(None),
            updated_at: Set(now),
            is_deleted: Set(false),
            deleted_at: Set(None),
            deleted_by: Set(None),
        };

        Ok(unit.insert(self.db.as_ref()).await?)
    }

    /// Gets a flat by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the flat is not found or the query fails.
    pub async fn get_flat(&self, flat_id: Uuid) -> Result<flats::Model, UnitError> {
        find_active::<flats::Entity>()
            .filter(flats::Column::Id.eq(flat_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(UnitError::NotFound(flat_id))
    }

    /// Gets a housing unit by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit is not found or the query fails.
    pub async fn get_housing_unit(&self, unit_id: Uuid) -> Result<housing_units::Model, UnitError> {
        find_active::<housing_units::Entity>()
            .filter(housing_units::Column::Id.eq(unit_id))
            .one(self.db.as_ref())
            .await?
            .ok_or(UnitError::NotFound(unit_id))
    }

    /// Updates a flat's profile fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the flat is not found, the new floor exceeds the
    /// building's total, or the update fails.
    pub async fn update_flat(
        &self,
        flat_id: Uuid,
        input: UpdateFlatInput,
        updated_by: Uuid,
    ) -> Result<flats::Model, UnitError> {
        let flat = self.get_flat(flat_id).await?;

        if let Some(floor) = input.floor_number {
            let building = find_active::<buildings::Entity>()
                .filter(buildings::Column::Id.eq(flat.building_id))
                .one(self.db.as_ref())
                .await?
                .ok_or(UnitError::BuildingNotFound(flat.building_id))?;
            if floor > building.total_floors {
                return Err(UnitError::FloorOutOfRange {
                    floor,
                    total: building.total_floors,
                });
            }
        }

        let mut active: flats::ActiveModel = flat.into();
        if let Some(flat_number) = input.flat_number {
            active.flat_number = Set(flat_number);
        }
        if let Some(floor_number) = input.floor_number {
            active.floor_number = Set(floor_number);
        }
        if let Some(square_foot) = input.square_foot {
            active.square_foot = Set(Some(square_foot));
        }
        active.updated_by = Set(Some(updated_by));
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Updates a housing unit's profile fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit is not found or the update fails.
    pub async fn update_housing_unit(
        &self,
        unit_id: Uuid,
        input: UpdateHousingUnitInput,
        updated_by: Uuid,
    ) -> Result<housing_units::Model, UnitError> {
        let housing_unit = self.get_housing_unit(unit_id).await?;

        let mut active: housing_units::ActiveModel = housing_unit.into();
        if let Some(unit_number) = input.unit_number {
            active.unit_number = Set(unit_number);
        }
        if let Some(square_foot) = input.square_foot {
            active.square_foot = Set(Some(square_foot));
        }
        active.updated_by = Set(Some(updated_by));
        active.updated_at = Set(Utc::now().into());

        Ok(active.update(self.db.as_ref()).await?)
    }

    /// Lists flats of a building, ordered by flat number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_flats(&self, building_id: Uuid) -> Result<Vec<flats::Model>, UnitError> {
        Ok(find_active::<flats::Entity>()
            .filter(flats::Column::BuildingId.eq(building_id))
            .order_by_asc(flats::Column::FlatNumber)
            .all(self.db.as_ref())
            .await?)
    }

    /// Lists housing units of a society, ordered by unit number.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub async fn list_housing_units(
        &self,
        society_id: Uuid,
    ) -> Result<Vec<housing_units::Model>, UnitError> {
        Ok(find_active::<housing_units::Entity>()
            .filter(housing_units::Column::SocietyId.eq(society_id))
            .order_by_asc(housing_units::Column::UnitNumber)
            .all(self.db.as_ref())
            .await?)
    }

    /// Soft-deletes a flat or housing unit.
    ///
    /// # Errors
    ///
    /// Returns an error if the unit is not found or the update fails.
    pub async fn delete(&self, unit: UnitRef, deleted_by: Uuid) -> Result<(), UnitError> {
        let now = Utc::now().into();
        match unit.kind {
            UnitKind::Flat => {
                let flat = self.get_flat(unit.id).await?;
                let mut active: flats::ActiveModel = flat.into();
                active.is_deleted = Set(true);
                active.deleted_at = Set(Some(now));
                active.deleted_by = Set(Some(deleted_by));
                active.updated_at = Set(now);
                active.update(self.db.as_ref()).await?;
            }
            UnitKind::HousingUnit => {
                let housing_unit = self.get_housing_unit(unit.id).await?;
                let mut active: housing_units::ActiveModel = housing_unit.into();
                active.is_deleted = Set(true);
                active.deleted_at = Set(Some(now));
                active.deleted_by = Set(Some(deleted_by));
                active.updated_at = Set(now);
                active.update(self.db.as_ref()).await?;
            }
        }
        Ok(())
    }
}
