//! `SeaORM` entity definitions.
//!
//! All entities carry soft-delete markers (`is_deleted`, `deleted_at`,
//! `deleted_by`) and audit fields (`created_by/at`, `updated_by/at`).

pub mod buildings;
pub mod flat_maintenance_monthlies;
pub mod flat_maintenance_settlements;
pub mod flat_maintenances;
pub mod flat_penalties;
pub mod flats;
pub mod housing_units;
pub mod member_monthly_dues;
pub mod members;
pub mod notices;
pub mod poll_options;
pub mod poll_votes;
pub mod polls;
pub mod societies;
pub mod unit_penalties;
pub mod users;
