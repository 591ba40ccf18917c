//! Domain types and rules for gridwatch.
//!
//! Nothing in this crate touches the database or HTTP; the `db` and `api`
//! crates build on these types.

pub mod alert;
pub mod error;
pub mod types;
pub mod weekday;
