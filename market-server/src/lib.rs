//! Market Server - freelance marketplace backend
//!
//! Sellers publish gigs with Basic/Standard/Premium packages; buyers
//! search them, place orders and pay through a checkout gateway. Orders
//! move through an event-sourced lifecycle whose side effects keep seller
//! counters, gig statistics and participant notifications in step.
//!
//! # Module layout
//!
//! ```text
//! market-server/src/
//! ├── core/       # config, state, errors, server
//! ├── auth/       # JWT validation, CurrentUser extractor
//! ├── db/         # embedded redb database
//! ├── accounts/   # user profiles and seller stats
//! ├── catalog/    # gig storage, gig service, search and ranking
//! ├── orders/     # order commands, events, lifecycle effects
//! ├── payment/    # checkout gateway and webhook verification
//! ├── notify/     # notification emitters
//! ├── live/       # per-user live broadcast hub
//! ├── api/        # HTTP routes and handlers
//! └── utils/      # logging and input validation
//! ```

pub mod accounts;
pub mod api;
pub mod auth;
pub mod catalog;
pub mod core;
pub mod db;
pub mod live;
pub mod notify;
pub mod orders;
pub mod payment;
pub mod utils;

pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState};
pub use orders::{OrderStorage, OrdersManager};
pub use utils::logger::{init_logger, init_logger_with_file};

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCode};
