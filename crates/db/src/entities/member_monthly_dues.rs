//! `SeaORM` Entity for the member_monthly_dues table.
//!
//! The per-month billable instance shown to members. At most one non-deleted
//! row per flat/unit per `month_year` (partial unique index).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "member_monthly_dues")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub society_id: Uuid,
    pub building_id: Option<Uuid>,
    pub flat_id: Option<Uuid>,
    pub housing_unit_id: Option<Uuid>,
    /// Members billed by this due, for display-name aggregation.
    pub member_ids: Vec<Uuid>,
    /// First day of the billed month.
    pub month_year: Date,
    pub maintenance_amount: Decimal,
    pub penalty_amount: Decimal,
    pub total_due: Decimal,
    pub maintenance_paid: bool,
    pub maintenance_paid_at: Option<DateTimeWithTimeZone>,
    pub penalty_paid: bool,
    pub penalty_paid_at: Option<DateTimeWithTimeZone>,
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
        belongs_to = "super::societies::Entity",
        from = "Column::SocietyId",
        to = "super::societies::Column::Id"
    )]
    Societies,
}

impl Related<super::societies::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Societies.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl crate::soft_delete::SoftDeletable for Entity {
    fn is_deleted_column() -> Self::Column {
        Column::IsDeleted
    }
}
