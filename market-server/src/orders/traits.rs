//! Core traits of the order pipeline
//!
//! - [`CommandHandler`]: validates a command against the current order and
//!   produces events
//! - [`EventApplier`]: folds one event into an [`OrderSnapshot`] (defined
//!   next to its dispatch enum in `appliers`)
//! - [`CommandContext`]: the write transaction plus a snapshot cache shared
//!   by every step of one command

use std::collections::HashMap;

use async_trait::async_trait;
use redb::WriteTransaction;
use shared::models::{Gig, UserProfile};
use shared::order::{Actor, OrderEvent, OrderSnapshot, OrderStatus};
use thiserror::Error;

use crate::accounts::AccountStorage;
use crate::catalog::CatalogStorage;
use crate::db::StorageError;
use crate::orders::storage::OrderStorage;

pub use crate::orders::appliers::EventApplier;

/// Action-level errors
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(String),

    #[error("Gig not found: {0}")]
    GigNotFound(i64),

    #[error("Gig is not available for ordering: {0}")]
    GigNotListable(i64),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Invalid package: {0}")]
    InvalidPackage(String),

    #[error("You cannot order your own gig")]
    SelfOrder,

    #[error("Not authorized: {0}")]
    NotAuthorized(String),

    #[error("Cannot {action} an order in status {from}")]
    InvalidTransition {
        from: OrderStatus,
        action: &'static str,
    },

    #[error("Maximum revisions exceeded ({max})")]
    RevisionLimitReached { max: u32 },

    #[error("Review already left for order {0}")]
    ReviewAlreadyLeft(String),

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Could not allocate a unique order code")]
    OrderCodeExhausted,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl From<StorageError> for OrderError {
    fn from(err: StorageError) -> Self {
        OrderError::Storage(err.to_string())
    }
}

/// Who issued a command, and when
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    pub command_id: String,
    pub actor: Actor,
    /// Client timestamp
    pub timestamp: i64,
}

impl CommandMetadata {
    /// User id of the actor, or `NotAuthorized` for the gateway
    pub fn require_user(&self) -> Result<&str, OrderError> {
        self.actor
            .user_id()
            .ok_or_else(|| OrderError::NotAuthorized("a user identity is required".to_string()))
    }

    /// Payment transitions are reserved for the gateway
    pub fn require_gateway(&self) -> Result<(), OrderError> {
        if self.actor.is_gateway() {
            Ok(())
        } else {
            Err(OrderError::NotAuthorized(
                "payment events are accepted only from the payment gateway".to_string(),
            ))
        }
    }
}

/// State shared by the action and the appliers while one command runs.
///
/// Every read goes through the write transaction, so the status a guard
/// checks is the status the commit overwrites.
pub struct CommandContext<'a> {
    txn: &'a WriteTransaction,
    storage: &'a OrderStorage,
    catalog: &'a CatalogStorage,
    accounts: &'a AccountStorage,
    snapshots: HashMap<String, OrderSnapshot>,
    sequence: u64,
    now: i64,
}

impl<'a> CommandContext<'a> {
    pub fn new(
        txn: &'a WriteTransaction,
        storage: &'a OrderStorage,
        catalog: &'a CatalogStorage,
        accounts: &'a AccountStorage,
        current_sequence: u64,
        now: i64,
    ) -> Self {
        Self {
            txn,
            storage,
            catalog,
            accounts,
            snapshots: HashMap::new(),
            sequence: current_sequence,
            now,
        }
    }

    /// Load a snapshot (cache first, then the transaction)
    pub fn load_snapshot(&mut self, order_id: &str) -> Result<OrderSnapshot, OrderError> {
        if let Some(snapshot) = self.snapshots.get(order_id) {
            return Ok(snapshot.clone());
        }
        let snapshot = self
            .storage
            .get_snapshot_txn(self.txn, order_id)?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))?;
        self.snapshots
            .insert(order_id.to_string(), snapshot.clone());
        Ok(snapshot)
    }

    /// Snapshot as stored before this command touched it
    pub fn stored_snapshot(&self, order_id: &str) -> Result<Option<OrderSnapshot>, OrderError> {
        Ok(self.storage.get_snapshot_txn(self.txn, order_id)?)
    }

    pub fn save_snapshot(&mut self, snapshot: OrderSnapshot) {
        self.snapshots.insert(snapshot.order_id.clone(), snapshot);
    }

    pub fn modified_snapshots(&self) -> impl Iterator<Item = &OrderSnapshot> {
        self.snapshots.values()
    }

    /// Allocate the next global sequence number
    pub fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    pub fn current_sequence(&self) -> u64 {
        self.sequence
    }

    /// Server time for this command
    pub fn now(&self) -> i64 {
        self.now
    }

    pub fn find_gig(&self, gig_id: i64) -> Result<Option<Gig>, OrderError> {
        Ok(self.catalog.get_gig_txn(self.txn, gig_id)?)
    }

    pub fn find_user(&self, user_id: &str) -> Result<Option<UserProfile>, OrderError> {
        Ok(self.accounts.get_user_txn(self.txn, user_id)?)
    }

    pub fn order_code_exists(&self, code: &str) -> Result<bool, OrderError> {
        Ok(self.storage.order_code_exists_txn(self.txn, code)?)
    }
}

/// Validates one command and turns it into events
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError>;
}

