//! `SeaORM` Entity for the flat_penalties table.
//!
//! Independent penalty ledger for flats; the housing-unit mirror lives in
//! `unit_penalties`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "flat_penalties")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub society_id: Uuid,
    pub flat_id: Uuid,
    pub amount: Decimal,
    pub reason: String,
    pub is_paid: bool,
    pub paid_at: Option<DateTimeWithTimeZone>,
    pub razorpay_order_id: Option<String>,
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
        belongs_to = "super::flats::Entity",
        from = "Column::FlatId",
        to = "super::flats::Column::Id"
    )]
    Flats,
}

impl Related<super::flats::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Flats.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl crate::soft_delete::SoftDeletable for Entity {
    fn is_deleted_column() -> Self::Column {
        Column::IsDeleted
    }
}
