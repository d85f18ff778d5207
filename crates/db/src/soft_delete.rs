//! Centralized soft-delete filter.
//!
//! Every entity carries `is_deleted`/`deleted_at`/`deleted_by` markers and
//! deletion is logical. Rather than scattering `is_deleted = false` filters
//! across repositories, queries start from [`find_active`]; admin
//! "show deleted" views call `Entity::find()` directly.

use sea_orm::entity::prelude::*;
use sea_orm::{QueryFilter, Select};

/// Entities that carry the soft-delete marker column.
pub trait SoftDeletable: EntityTrait {
    /// The `is_deleted` column of this entity.
    fn is_deleted_column() -> Self::Column;
}

/// Starts a select over the non-deleted rows of an entity.
pub fn find_active<E: SoftDeletable>() -> Select<E> {
    E::find().filter(E::is_deleted_column().eq(false))
}
