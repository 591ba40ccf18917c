//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod alert_repo;
pub mod power_sample_repo;

pub use alert_repo::{AlertRepo, OwnedWrite};
pub use power_sample_repo::PowerSampleRepo;
