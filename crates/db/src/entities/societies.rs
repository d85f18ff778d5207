//! `SeaORM` Entity for the societies table (tenant root).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "societies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    /// Wire society type: residential, commercial, or housing.
    pub society_type: String,
    /// Subscription expiry; settable only by super_admin.
    pub end_date: Option<Date>,
    pub opening_balance: Decimal,
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
    #[sea_orm(has_many = "super::buildings::Entity")]
    Buildings,
    #[sea_orm(has_many = "super::housing_units::Entity")]
    HousingUnits,
    #[sea_orm(has_many = "super::notices::Entity")]
    Notices,
    #[sea_orm(has_many = "super::polls::Entity")]
    Polls,
}

impl Related<super::buildings::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Buildings.def()
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
