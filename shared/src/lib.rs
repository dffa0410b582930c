//! Shared types for the marketplace
//!
//! Common types used by the server and its API clients: error codes,
//! gig and user models, order commands/events/snapshots, notification
//! kinds, search request/response types and pagination.

pub mod error;
pub mod models;
pub mod notification;
pub mod order;
pub mod response;
pub mod search;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
