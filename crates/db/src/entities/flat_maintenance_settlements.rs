//! `SeaORM` Entity for the flat_maintenance_settlements table.
//!
//! One-time lump amount; present only while the parent plan's `amount_type`
//! is settlement.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "flat_maintenance_settlements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub flat_maintenance_id: Uuid,
    pub amount: Decimal,
    pub is_paid: bool,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub razorpay_payment_id: Option<String>,
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
        belongs_to = "super::flat_maintenances::Entity",
        from = "Column::FlatMaintenanceId",
        to = "super::flat_maintenances::Column::Id"
    )]
    FlatMaintenances,
}

impl Related<super::flat_maintenances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FlatMaintenances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl crate::soft_delete::SoftDeletable for Entity {
    fn is_deleted_column() -> Self::Column {
        Column::IsDeleted
    }
}
