//! Order Event Sourcing Module
//!
//! This module provides types for the order lifecycle:
//! - Commands: Requests from buyers, sellers or the payment gateway
//! - Events: Immutable facts recorded after command processing
//! - Snapshots: Current order state computed from the event stream
//! - Reports: Payment history and totals derived from snapshots

pub mod command;
pub mod event;
pub mod report;
pub mod snapshot;
pub mod types;

// Re-exports
pub use command::{OrderCommand, OrderCommandPayload};
pub use event::{EventPayload, OrderEvent, OrderEventType};
pub use report::{BuyerSpending, FeeQuote, PaymentRecord, SellerEarnings};
pub use snapshot::OrderSnapshot;
pub use types::*;
