//! Initial schema: registries, maintenance plans, dues, penalties, notices,
//! and polls.
//!
//! Every table carries audit columns and soft-delete markers; uniqueness
//! constraints are partial indexes scoped to non-deleted rows.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS poll_votes, poll_options, polls, notices,
             unit_penalties, flat_penalties, member_monthly_dues,
             flat_maintenance_monthlies, flat_maintenance_settlements,
             flat_maintenances, members, housing_units, flats, buildings,
             societies, users CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
-- Users (identity itself is managed upstream; rows exist for display names,
-- role checks, and audit references)
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    role VARCHAR(32) NOT NULL CHECK (role IN ('super_admin', 'admin', 'member')),
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_by UUID,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    deleted_at TIMESTAMPTZ,
    deleted_by UUID
);

-- Societies (tenant root)
CREATE TABLE societies (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    address TEXT NOT NULL,
    city VARCHAR(128) NOT NULL,
    state VARCHAR(128) NOT NULL,
    country VARCHAR(128) NOT NULL,
    society_type VARCHAR(32) NOT NULL
        CHECK (society_type IN ('residential', 'commercial', 'housing')),
    end_date DATE,
    opening_balance NUMERIC(14, 2) NOT NULL DEFAULT 0,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_by UUID,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    deleted_at TIMESTAMPTZ,
    deleted_by UUID
);

CREATE UNIQUE INDEX idx_societies_name ON societies(name) WHERE NOT is_deleted;

-- Buildings
CREATE TABLE buildings (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    society_id UUID NOT NULL REFERENCES societies(id),
    name VARCHAR(255) NOT NULL,
    total_floors INTEGER NOT NULL CHECK (total_floors >= 1),
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_by UUID,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    deleted_at TIMESTAMPTZ,
    deleted_by UUID
);

CREATE INDEX idx_buildings_society ON buildings(society_id) WHERE NOT is_deleted;

-- Flats (residential/commercial societies)
CREATE TABLE flats (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    building_id UUID NOT NULL REFERENCES buildings(id),
    flat_number VARCHAR(32) NOT NULL,
    floor_number INTEGER NOT NULL,
    square_foot NUMERIC(10, 2),
    is_occupied BOOLEAN NOT NULL DEFAULT false,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_by UUID,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    deleted_at TIMESTAMPTZ,
    deleted_by UUID
);

CREATE INDEX idx_flats_building ON flats(building_id) WHERE NOT is_deleted;

-- Housing units (housing societies; no building in between)
CREATE TABLE housing_units (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    society_id UUID NOT NULL REFERENCES societies(id),
    unit_number VARCHAR(32) NOT NULL,
    square_foot NUMERIC(10, 2),
    is_occupied BOOLEAN NOT NULL DEFAULT false,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_by UUID,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    deleted_at TIMESTAMPTZ,
    deleted_by UUID
);

CREATE INDEX idx_housing_units_society ON housing_units(society_id) WHERE NOT is_deleted;

-- Members: user assigned to a flat or housing unit within a society
CREATE TABLE members (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id),
    society_id UUID NOT NULL REFERENCES societies(id),
    building_id UUID REFERENCES buildings(id),
    flat_id UUID REFERENCES flats(id),
    housing_unit_id UUID REFERENCES housing_units(id),
    move_in_date DATE NOT NULL,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_by UUID,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    deleted_at TIMESTAMPTZ,
    deleted_by UUID,
    CONSTRAINT chk_member_unit CHECK (
        (flat_id IS NOT NULL) <> (housing_unit_id IS NOT NULL)
    )
);

CREATE INDEX idx_members_society ON members(society_id) WHERE NOT is_deleted;
CREATE INDEX idx_members_flat ON members(flat_id) WHERE NOT is_deleted;
CREATE INDEX idx_members_unit ON members(housing_unit_id) WHERE NOT is_deleted;

-- Maintenance plan head: one row per flat/unit, amount_type is exclusive
CREATE TABLE flat_maintenances (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    society_id UUID NOT NULL REFERENCES societies(id),
    flat_id UUID REFERENCES flats(id),
    housing_unit_id UUID REFERENCES housing_units(id),
    amount_type VARCHAR(32)
        CHECK (amount_type IN ('settlement', 'quarterly', 'halfyearly', 'yearly')),
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_by UUID,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    deleted_at TIMESTAMPTZ,
    deleted_by UUID,
    CONSTRAINT chk_maintenance_unit CHECK (
        (flat_id IS NOT NULL) <> (housing_unit_id IS NOT NULL)
    )
);

CREATE UNIQUE INDEX idx_flat_maintenances_flat
    ON flat_maintenances(flat_id) WHERE NOT is_deleted AND flat_id IS NOT NULL;
CREATE UNIQUE INDEX idx_flat_maintenances_unit
    ON flat_maintenances(housing_unit_id)
    WHERE NOT is_deleted AND housing_unit_id IS NOT NULL;

-- One-time settlement amounts
CREATE TABLE flat_maintenance_settlements (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    flat_maintenance_id UUID NOT NULL REFERENCES flat_maintenances(id),
    amount NUMERIC(14, 2) NOT NULL,
    is_paid BOOLEAN NOT NULL DEFAULT false,
    paid_at TIMESTAMPTZ,
    razorpay_payment_id VARCHAR(64),
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_by UUID,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    deleted_at TIMESTAMPTZ,
    deleted_by UUID
);

CREATE INDEX idx_settlements_maintenance
    ON flat_maintenance_settlements(flat_maintenance_id) WHERE NOT is_deleted;

-- Recurring monthly amounts: 3, 6, or 12 rows per plan
CREATE TABLE flat_maintenance_monthlies (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    flat_maintenance_id UUID NOT NULL REFERENCES flat_maintenances(id),
    month INTEGER NOT NULL CHECK (month BETWEEN 1 AND 12),
    amount NUMERIC(14, 2) NOT NULL,
    is_paid BOOLEAN NOT NULL DEFAULT false,
    paid_at TIMESTAMPTZ,
    razorpay_payment_id VARCHAR(64),
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_by UUID,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    deleted_at TIMESTAMPTZ,
    deleted_by UUID
);

CREATE INDEX idx_monthlies_maintenance
    ON flat_maintenance_monthlies(flat_maintenance_id) WHERE NOT is_deleted;

-- Per-month billable dues shown to members
CREATE TABLE member_monthly_dues (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    society_id UUID NOT NULL REFERENCES societies(id),
    building_id UUID REFERENCES buildings(id),
    flat_id UUID REFERENCES flats(id),
    housing_unit_id UUID REFERENCES housing_units(id),
    member_ids UUID[] NOT NULL DEFAULT '{}',
    month_year DATE NOT NULL,
    maintenance_amount NUMERIC(14, 2) NOT NULL,
    penalty_amount NUMERIC(14, 2) NOT NULL DEFAULT 0,
    total_due NUMERIC(14, 2) NOT NULL,
    maintenance_paid BOOLEAN NOT NULL DEFAULT false,
    maintenance_paid_at TIMESTAMPTZ,
    penalty_paid BOOLEAN NOT NULL DEFAULT false,
    penalty_paid_at TIMESTAMPTZ,
    razorpay_payment_id VARCHAR(64),
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_by UUID,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    deleted_at TIMESTAMPTZ,
    deleted_by UUID,
    CONSTRAINT chk_due_unit CHECK (
        (flat_id IS NOT NULL) <> (housing_unit_id IS NOT NULL)
    )
);

-- At most one non-deleted due row per flat/unit per month
CREATE UNIQUE INDEX idx_dues_flat_month
    ON member_monthly_dues(flat_id, month_year)
    WHERE NOT is_deleted AND flat_id IS NOT NULL;
CREATE UNIQUE INDEX idx_dues_unit_month
    ON member_monthly_dues(housing_unit_id, month_year)
    WHERE NOT is_deleted AND housing_unit_id IS NOT NULL;
CREATE INDEX idx_dues_society_month
    ON member_monthly_dues(society_id, month_year) WHERE NOT is_deleted;

-- Penalty ledger, flat family
CREATE TABLE flat_penalties (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    society_id UUID NOT NULL REFERENCES societies(id),
    flat_id UUID NOT NULL REFERENCES flats(id),
    amount NUMERIC(14, 2) NOT NULL,
    reason TEXT NOT NULL,
    is_paid BOOLEAN NOT NULL DEFAULT false,
    paid_at TIMESTAMPTZ,
    razorpay_order_id VARCHAR(64),
    razorpay_payment_id VARCHAR(64),
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_by UUID,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    deleted_at TIMESTAMPTZ,
    deleted_by UUID
);

CREATE INDEX idx_flat_penalties_society ON flat_penalties(society_id) WHERE NOT is_deleted;

-- Penalty ledger, housing-unit family
CREATE TABLE unit_penalties (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    society_id UUID NOT NULL REFERENCES societies(id),
    housing_unit_id UUID NOT NULL REFERENCES housing_units(id),
    amount NUMERIC(14, 2) NOT NULL,
    reason TEXT NOT NULL,
    is_paid BOOLEAN NOT NULL DEFAULT false,
    paid_at TIMESTAMPTZ,
    razorpay_order_id VARCHAR(64),
    razorpay_payment_id VARCHAR(64),
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_by UUID,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    deleted_at TIMESTAMPTZ,
    deleted_by UUID
);

CREATE INDEX idx_unit_penalties_society ON unit_penalties(society_id) WHERE NOT is_deleted;

-- Notices
CREATE TABLE notices (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    society_id UUID NOT NULL REFERENCES societies(id),
    title VARCHAR(255) NOT NULL,
    body TEXT NOT NULL,
    starts_on DATE NOT NULL,
    ends_on DATE,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_by UUID,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    deleted_at TIMESTAMPTZ,
    deleted_by UUID
);

CREATE INDEX idx_notices_society ON notices(society_id) WHERE NOT is_deleted;

-- Polls
CREATE TABLE polls (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    society_id UUID NOT NULL REFERENCES societies(id),
    question TEXT NOT NULL,
    expires_at TIMESTAMPTZ NOT NULL,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_by UUID,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    deleted_at TIMESTAMPTZ,
    deleted_by UUID
);

CREATE INDEX idx_polls_society ON polls(society_id) WHERE NOT is_deleted;

CREATE TABLE poll_options (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    poll_id UUID NOT NULL REFERENCES polls(id),
    label VARCHAR(255) NOT NULL,
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_by UUID,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    deleted_at TIMESTAMPTZ,
    deleted_by UUID
);

CREATE INDEX idx_poll_options_poll ON poll_options(poll_id) WHERE NOT is_deleted;

CREATE TABLE poll_votes (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    poll_id UUID NOT NULL REFERENCES polls(id),
    option_id UUID NOT NULL REFERENCES poll_options(id),
    user_id UUID NOT NULL REFERENCES users(id),
    created_by UUID NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_by UUID,
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    is_deleted BOOLEAN NOT NULL DEFAULT false,
    deleted_at TIMESTAMPTZ,
    deleted_by UUID
);

-- One vote per user per poll
CREATE UNIQUE INDEX idx_poll_votes_poll_user
    ON poll_votes(poll_id, user_id) WHERE NOT is_deleted;
CREATE INDEX idx_poll_votes_option ON poll_votes(option_id) WHERE NOT is_deleted;
";
