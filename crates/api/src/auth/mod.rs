//! Bearer-token primitives.
//!
//! Credential checks and session issuance live outside this service; it
//! only needs to verify the tokens it is handed and read the user id out
//! of them.

pub mod jwt;
