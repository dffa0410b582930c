//! Order lifecycle module
//!
//! Orders are event sourced: every accepted command appends events to redb
//! and updates the order snapshot in the same transaction.
//!
//! - **manager**: OrdersManager, command processing and queries
//! - **actions**: one handler per command
//! - **appliers**: one snapshot mutation per event
//! - **effects**: counters, notifications and broadcasts per transition
//! - **storage**: redb tables for events, snapshots and indexes
//!
//! # Architecture
//!
//! ```text
//! Command → OrdersManager → Event → Storage (redb)
//!                 ↓                      ↓
//!        Counter effects          Snapshot update
//!                 ↓
//!     Broadcast + notifications (after commit)
//! ```

pub mod actions;
pub mod appliers;
pub mod code;
pub mod effects;
pub mod manager;
pub mod money;
pub mod storage;
pub mod traits;

// Re-exports
pub use manager::{ManagerError, ManagerResult, OrderListRole, OrdersManager};
pub use storage::OrderStorage;

// Re-export shared types for convenience
pub use shared::order::{
    CommandError, CommandErrorCode, CommandResponse, EventPayload, OrderCommand,
    OrderCommandPayload, OrderEvent, OrderEventType, OrderSnapshot, OrderStatus,
};
