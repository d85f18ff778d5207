//! Shared types and configuration for Strata.
//!
//! This crate provides common types used across all other crates:
//! - Application configuration
//! - The JSON response envelope shared by every endpoint
//! - Role and society-type vocabulary

pub mod config;
pub mod envelope;
pub mod types;

pub use config::AppConfig;
pub use envelope::ApiEnvelope;
pub use types::{Role, SocietyType, UnitKind};
