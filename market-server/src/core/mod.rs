//! Core: configuration, shared state, errors and the HTTP server
//!
//! - [`Config`] - environment driven configuration
//! - [`ServerState`] - services shared by every handler
//! - [`Server`] - binds and serves the API
//! - [`ServerError`] - startup failures

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::{Config, StripeConfig};
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
