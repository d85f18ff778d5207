//! `SeaORM` Entity for the flat_maintenances table.
//!
//! One row per flat (or housing unit) describing the billing plan.
//! `amount_type` is mutually exclusive and set by the most recent management
//! action; child settlement/monthly rows carry the actual amounts.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "flat_maintenances")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub society_id: Uuid,
    pub flat_id: Option<Uuid>,
    pub housing_unit_id: Option<Uuid>,
    /// settlement | quarterly | halfyearly | yearly; None until a plan is set.
    pub amount_type: Option<String>,
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
        belongs_to = "super::societies::Entity",
        from = "Column::SocietyId",
        to = "super::societies::Column::Id"
    )]
    Societies,
    #[sea_orm(has_many = "super::flat_maintenance_settlements::Entity")]
    Settlements,
    #[sea_orm(has_many = "super::flat_maintenance_monthlies::Entity")]
    Monthlies,
}

impl Related<super::flat_maintenance_settlements::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Settlements.def()
    }
}

impl Related<super::flat_maintenance_monthlies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Monthlies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl crate::soft_delete::SoftDeletable for Entity {
    fn is_deleted_column() -> Self::Column {
        Column::IsDeleted
    }
}
