//! `SeaORM` Entity for the members table.
//!
//! Join entity linking a user to a flat or housing unit within a society.
//! Exactly one of `flat_id` / `housing_unit_id` is set, depending on the
//! society type.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "members")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub society_id: Uuid,
    pub building_id: Option<Uuid>,
    pub flat_id: Option<Uuid>,
    pub housing_unit_id: Option<Uuid>,
    pub move_in_date: Date,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_by: Option<Uuid>,
    pub updated_at: DateTimeWithTimeZone,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTimeWithTimeZone>,
    pub deleted_by: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::societies::Entity",
        from = "Column::SocietyId",
        to = "super::societies::Column::Id"
    )]
    Societies,
    #[sea_orm(
        belongs_to = "super::flats::Entity",
        from = "Column::FlatId",
        to = "super::flats::Column::Id"
    )]
    Flats,
    #[sea_orm(
        belongs_to = "super::housing_units::Entity",
        from = "Column::HousingUnitId",
        to = "super::housing_units::Column::Id"
    )]
    HousingUnits,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::flats::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flats.def()
    }
}

impl Related<super::housing_units::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::HousingUnits.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl crate::soft_delete::SoftDeletable for Entity {
    fn is_deleted_column() -> Self::Column {
        Column::IsDeleted
    }
}
