//! Database layer with `SeaORM` entities and repositories.
//!
//! This crate provides:
//! - `SeaORM` entity definitions
//! - Repository abstractions for data access
//! - Database migrations
//! - The centralized soft-delete filter

pub mod entities;
pub mod migration;
pub mod repositories;
pub mod soft_delete;

pub use repositories::{
    BuildingRepository, DuesRepository, MaintenanceRepository, MemberRepository, NoticeRepository,
    PenaltyRepository, PollRepository, SocietyRepository, UnitRepository,
};
pub use soft_delete::{SoftDeletable, find_active};

use sea_orm::{Database, DatabaseConnection, DbErr};

/// Establishes a connection to the database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    Database::connect(database_url).await
}
