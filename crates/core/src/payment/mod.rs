//! Payment gateway domain logic.

pub mod signature;
