//! Data models
//!
//! Shared between market-server and API clients.
//! Gig IDs are snowflake `i64`; user IDs are the JWT subject string.

pub mod gig;
pub mod user;

// Re-exports
pub use gig::*;
pub use user::*;
