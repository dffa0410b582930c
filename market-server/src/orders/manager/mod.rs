//! OrdersManager - Core command processing and event generation
//!
//! This module handles:
//! - Command validation and processing
//! - Event generation with global sequence numbers
//! - Persistence to redb (transactional)
//! - Counter effects on gigs and seller profiles (same transaction)
//! - Notifications and event broadcasting (after commit)
//!
//! # Command Flow
//!
//! ```text
//! execute_command(cmd)
//!     ├─ 1. Idempotency check (command_id)
//!     ├─ 2. Begin write transaction
//!     ├─ 3. Create CommandContext
//!     ├─ 4. Convert command to action and execute
//!     ├─ 5. Apply events to snapshots via EventApplier
//!     ├─ 6. Derive transition effects, apply counter effects
//!     ├─ 7. Persist events, snapshots and indexes
//!     ├─ 8. Mark command processed
//!     ├─ 9. Commit transaction
//!     ├─ 10. Broadcast event(s), emit notifications
//!     └─ 11. Return response
//! ```

mod error;
mod reports;
pub use error::*;

use std::sync::Arc;

use redb::WriteTransaction;
use shared::order::{
    CommandResponse, EventPayload, OrderCommand, OrderEvent, OrderSnapshot, OrderStatus,
    PartyRole, PaymentStatus,
};
use shared::response::PaginatedResponse;
use tokio::sync::broadcast;

use super::actions::CommandAction;
use super::appliers::{EventAction, replay};
use super::effects::{TransitionEffect, transition_effects};
use super::storage::OrderStorage;
use super::traits::{CommandContext, CommandHandler, CommandMetadata, EventApplier, OrderError};
use crate::accounts::AccountStorage;
use crate::catalog::CatalogStorage;
use crate::db::StorageError;
use crate::notify::NotificationEmitter;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 4096;

/// Which side of an order a listing asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderListRole {
    #[default]
    All,
    Buying,
    Selling,
}

impl OrderListRole {
    /// Lenient parse of `type=buying|selling`; anything else lists both sides
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            Some("buying") => OrderListRole::Buying,
            Some("selling") => OrderListRole::Selling,
            _ => OrderListRole::All,
        }
    }

    fn party_role(self) -> Option<PartyRole> {
        match self {
            OrderListRole::All => None,
            OrderListRole::Buying => Some(PartyRole::Buyer),
            OrderListRole::Selling => Some(PartyRole::Seller),
        }
    }
}

/// Result of one committed command
struct Processed {
    response: CommandResponse,
    events: Vec<OrderEvent>,
    /// Effects that run after commit (notify, broadcast)
    deferred: Vec<TransitionEffect>,
}

/// OrdersManager for command processing
pub struct OrdersManager {
    storage: OrderStorage,
    catalog: CatalogStorage,
    accounts: AccountStorage,
    event_tx: broadcast::Sender<OrderEvent>,
    notifier: Arc<dyn NotificationEmitter>,
}

impl std::fmt::Debug for OrdersManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrdersManager")
            .field("storage", &"<OrderStorage>")
            .field("event_tx", &"<broadcast::Sender>")
            .field("notifier", &"<NotificationEmitter>")
            .finish()
    }
}

impl OrdersManager {
    /// Create a manager over stores that share one database
    pub fn new(
        storage: OrderStorage,
        catalog: CatalogStorage,
        accounts: AccountStorage,
        notifier: Arc<dyn NotificationEmitter>,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            storage,
            catalog,
            accounts,
            event_tx,
            notifier,
        }
    }

    /// Subscribe to event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.event_tx.subscribe()
    }

    /// Get the underlying storage
    pub fn storage(&self) -> &OrderStorage {
        &self.storage
    }

    /// Execute a command and return the response
    ///
    /// Notification failures are logged; they never change the response.
    pub async fn execute_command(&self, cmd: OrderCommand) -> CommandResponse {
        self.execute_command_with_events(cmd).await.0
    }

    /// Execute a command and return both the response and generated events
    pub async fn execute_command_with_events(
        &self,
        cmd: OrderCommand,
    ) -> (CommandResponse, Vec<OrderEvent>) {
        let command_id = cmd.command_id.clone();
        match self.process_command(cmd) {
            Ok(processed) => {
                self.run_deferred_effects(processed.deferred).await;
                (processed.response, processed.events)
            }
            Err(err) => (CommandResponse::error(command_id, err.into()), vec![]),
        }
    }

    /// Process command inside one write transaction
    ///
    /// Uses the action-based architecture:
    /// 1. Convert command to CommandAction
    /// 2. Execute action to generate events
    /// 3. Apply events to snapshots via EventApplier
    /// 4. Persist everything atomically
    fn process_command(&self, cmd: OrderCommand) -> ManagerResult<Processed> {
        tracing::debug!(command_id = %cmd.command_id, payload = ?cmd.payload, "Processing command");

        // 1. Idempotency check (before transaction)
        if self.storage.is_command_processed(&cmd.command_id)? {
            tracing::warn!(command_id = %cmd.command_id, "Duplicate command");
            return Ok(Processed::duplicate(cmd.command_id));
        }

        // 2. Begin write transaction
        let txn = self.storage.begin_write()?;

        // Double-check idempotency within transaction
        if self
            .storage
            .is_command_processed_txn(&txn, &cmd.command_id)?
        {
            tracing::warn!(command_id = %cmd.command_id, "Duplicate command");
            return Ok(Processed::duplicate(cmd.command_id));
        }

        // 3. Create context and metadata
        let current_sequence = self.storage.current_sequence_txn(&txn)?;
        let mut ctx = CommandContext::new(
            &txn,
            &self.storage,
            &self.catalog,
            &self.accounts,
            current_sequence,
            shared::util::now_millis(),
        );
        let metadata = CommandMetadata {
            command_id: cmd.command_id.clone(),
            actor: cmd.actor.clone(),
            timestamp: cmd.timestamp,
        };

        // 4. Convert to action and execute
        let action: CommandAction = (&cmd).into();
        let events = futures::executor::block_on(action.execute(&mut ctx, &metadata))?;

        // 5. Apply events to snapshots, 6. derive effects
        let mut effects = Vec::new();
        for event in &events {
            let mut snapshot = match ctx.load_snapshot(&event.order_id) {
                Ok(snapshot) => snapshot,
                Err(OrderError::OrderNotFound(_)) => OrderSnapshot::new(event.order_id.clone()),
                Err(e) => return Err(e.into()),
            };
            let applier: EventAction = event.into();
            applier.apply(&mut snapshot, event);
            effects.extend(transition_effects(&snapshot, event));
            ctx.save_snapshot(snapshot);
        }

        let (counters, deferred): (Vec<_>, Vec<_>) = effects
            .into_iter()
            .partition(TransitionEffect::is_transactional);
        for effect in &counters {
            self.apply_counter_effect(&txn, effect)?;
        }

        // 7. Persist events, snapshots and indexes
        for event in &events {
            self.storage.store_event(&txn, event)?;
            self.index_event(&txn, event)?;
        }
        for snapshot in ctx.modified_snapshots() {
            self.storage.store_snapshot(&txn, snapshot)?;
        }

        let max_sequence = ctx.current_sequence();
        if max_sequence > current_sequence {
            self.storage.set_sequence(&txn, max_sequence)?;
        }

        // 8. Mark command processed
        self.storage.mark_command_processed(&txn, &cmd.command_id)?;

        // 9. Commit transaction
        txn.commit().map_err(StorageError::from)?;

        let order_id = events.first().map(|e| e.order_id.clone());
        tracing::info!(command_id = %cmd.command_id, order_id = ?order_id, event_count = events.len(), "Command processed successfully");
        Ok(Processed {
            response: CommandResponse::success(cmd.command_id, order_id),
            events,
            deferred,
        })
    }

    /// Apply one counter effect inside the command transaction
    fn apply_counter_effect(
        &self,
        txn: &WriteTransaction,
        effect: &TransitionEffect,
    ) -> ManagerResult<()> {
        let (applied, target) = match effect {
            TransitionEffect::IncrementGigOrders { gig_id } => (
                self.catalog.increment_total_orders_txn(txn, *gig_id)?,
                gig_id.to_string(),
            ),
            TransitionEffect::RecordGigReview { gig_id, rating } => (
                self.catalog.record_review_txn(txn, *gig_id, *rating)?,
                gig_id.to_string(),
            ),
            TransitionEffect::AdjustSellerOngoing { seller_id, delta } => (
                self.accounts.adjust_ongoing_txn(txn, seller_id, *delta)?,
                seller_id.clone(),
            ),
            TransitionEffect::IncrementSellerCompleted { seller_id } => (
                self.accounts.increment_completed_txn(txn, seller_id)?,
                seller_id.clone(),
            ),
            TransitionEffect::RecordSellerReview { seller_id, rating } => (
                self.accounts.record_review_txn(txn, seller_id, *rating)?,
                seller_id.clone(),
            ),
            TransitionEffect::Notify(_) | TransitionEffect::Broadcast(_) => return Ok(()),
        };
        if !applied {
            tracing::warn!(target = %target, effect = ?effect, "Counter target missing, effect skipped");
        }
        Ok(())
    }

    /// Maintain the lookup indexes an event introduces
    fn index_event(&self, txn: &WriteTransaction, event: &OrderEvent) -> ManagerResult<()> {
        match &event.payload {
            EventPayload::OrderPlaced {
                order_code,
                buyer_id,
                seller_id,
                ..
            } => {
                self.storage
                    .index_order_code(txn, order_code, &event.order_id)?;
                self.storage
                    .index_party(txn, buyer_id, &event.order_id, PartyRole::Buyer)?;
                self.storage
                    .index_party(txn, seller_id, &event.order_id, PartyRole::Seller)?;
            }
            EventPayload::PaymentReferenceAttached { reference }
            | EventPayload::PaymentConfirmed {
                payment_reference: Some(reference),
            } => {
                self.storage
                    .index_payment_reference(txn, reference, &event.order_id)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Broadcast events and emit notifications; failures are logged only
    async fn run_deferred_effects(&self, effects: Vec<TransitionEffect>) {
        let mut broadcast_failed = false;
        for effect in effects {
            match effect {
                TransitionEffect::Broadcast(event) => {
                    if !broadcast_failed && self.event_tx.send(event).is_err() {
                        tracing::warn!("Event broadcast failed: no active receivers");
                        broadcast_failed = true;
                    }
                }
                TransitionEffect::Notify(notification) => {
                    if let Err(e) = self.notifier.emit(&notification).await {
                        tracing::warn!(
                            kind = notification.kind(),
                            user_id = %notification.recipient(),
                            error = %e,
                            "Notification emit failed"
                        );
                    }
                }
                _ => {}
            }
        }
    }

    // ========== Public Query Methods ==========

    /// Get a snapshot by order ID
    pub fn get_snapshot(&self, order_id: &str) -> ManagerResult<Option<OrderSnapshot>> {
        Ok(self.storage.get_snapshot(order_id)?)
    }

    /// Order detail for one of its parties
    pub fn get_order(&self, order_id: &str, viewer: &str) -> ManagerResult<OrderSnapshot> {
        let snapshot = self
            .storage
            .get_snapshot(order_id)?
            .ok_or_else(|| ManagerError::OrderNotFound(order_id.to_string()))?;
        if !snapshot.is_party(viewer) {
            return Err(ManagerError::NotAuthorized(
                "only the buyer or seller can view this order".to_string(),
            ));
        }
        Ok(snapshot)
    }

    /// Orders of `viewer`, newest first
    pub fn list_orders(
        &self,
        viewer: &str,
        role: OrderListRole,
        status: Option<OrderStatus>,
        page: u32,
        limit: u32,
    ) -> ManagerResult<PaginatedResponse<OrderSnapshot>> {
        let mut orders: Vec<OrderSnapshot> = self
            .storage
            .get_orders_for_party(viewer, role.party_role())?
            .into_iter()
            .filter(|o| status.is_none_or(|s| o.status == s))
            .collect();
        orders.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.order_id.cmp(&b.order_id))
        });
        Ok(PaginatedResponse::from_sorted(orders, page, limit))
    }

    /// Get current sequence number
    pub fn get_current_sequence(&self) -> ManagerResult<u64> {
        Ok(self.storage.get_current_sequence()?)
    }

    /// Get all events for a specific order
    pub fn get_events_for_order(&self, order_id: &str) -> ManagerResult<Vec<OrderEvent>> {
        Ok(self.storage.get_events_for_order(order_id)?)
    }

    /// Audit events for one of the order's parties
    pub fn get_order_events(&self, order_id: &str, viewer: &str) -> ManagerResult<Vec<OrderEvent>> {
        self.get_order(order_id, viewer)?;
        self.get_events_for_order(order_id)
    }

    /// Resolve a gateway payment reference to its order
    pub fn find_order_by_payment_reference(&self, reference: &str) -> ManagerResult<Option<String>> {
        Ok(self.storage.find_order_by_payment_reference(reference)?)
    }

    /// Rebuild a snapshot from events (for verification)
    ///
    /// Uses EventApplier to apply each event to build the snapshot.
    pub fn rebuild_snapshot(&self, order_id: &str) -> ManagerResult<OrderSnapshot> {
        let events = self.storage.get_events_for_order(order_id)?;
        if events.is_empty() {
            return Err(ManagerError::OrderNotFound(order_id.to_string()));
        }
        Ok(replay(order_id, &events))
    }

    // ========== Audit ==========

    /// Derive `ongoing_orders` / `completed_orders` from the order store
    /// and overwrite the seller's counters with them
    pub fn recompute_seller_stats(&self, seller_id: &str) -> ManagerResult<(u64, u64)> {
        let orders = self
            .storage
            .get_orders_for_party(seller_id, Some(PartyRole::Seller))?;
        let ongoing = orders.iter().filter(|o| o.status.is_ongoing()).count() as u64;
        let completed = orders
            .iter()
            .filter(|o| o.status == OrderStatus::Completed)
            .count() as u64;

        if self
            .accounts
            .set_order_counters(seller_id, ongoing, completed)?
            .is_none()
        {
            return Err(ManagerError::UserNotFound(seller_id.to_string()));
        }
        tracing::info!(seller_id = %seller_id, ongoing, completed, "Seller counters recomputed");
        Ok((ongoing, completed))
    }

    /// Derive `total_orders` (paid orders) for a gig from the order store
    pub fn recompute_gig_orders(&self, gig_id: i64) -> ManagerResult<u64> {
        let total = self
            .storage
            .get_all_snapshots()?
            .iter()
            .filter(|o| o.gig_id == gig_id && was_paid(o))
            .count() as u64;

        if !self.catalog.set_total_orders(gig_id, total)? {
            return Err(ManagerError::GigNotFound(gig_id));
        }
        tracing::info!(gig_id, total, "Gig order count recomputed");
        Ok(total)
    }
}

/// A payment was confirmed at some point in the order's life
fn was_paid(order: &OrderSnapshot) -> bool {
    matches!(
        order.payment_status,
        PaymentStatus::Paid | PaymentStatus::Released | PaymentStatus::Refunded
    )
}

impl Processed {
    fn duplicate(command_id: String) -> Self {
        Self {
            response: CommandResponse::duplicate(command_id),
            events: vec![],
            deferred: vec![],
        }
    }
}

// Make OrdersManager Clone-able; clones share stores and channel
impl Clone for OrdersManager {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            catalog: self.catalog.clone(),
            accounts: self.accounts.clone(),
            event_tx: self.event_tx.clone(),
            notifier: self.notifier.clone(),
        }
    }
}

#[cfg(test)]
mod tests;
