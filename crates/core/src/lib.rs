//! Core business logic for Strata.
//!
//! Pure domain rules with no web or database dependencies:
//! - Maintenance billing plan sum type and validation
//! - Payment gateway signature verification
//! - Poll lifecycle and result computation

pub mod maintenance;
pub mod payment;
pub mod poll;

pub use maintenance::{MaintenancePlan, MonthAmount, PlanError};
pub use payment::signature;
pub use poll::{OptionTally, PollResults, PollStatus};
