//! redb-based storage layer for the order lifecycle
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `order_events` | `(order_id, sequence)` | `OrderEvent` | Audit stream (append-only) |
//! | `orders` | `order_id` | `OrderSnapshot` | Current order record |
//! | `order_codes` | `order_code` | `order_id` | Uniqueness of human-readable codes |
//! | `payment_refs` | `payment_reference` | `order_id` | Webhook fallback lookup |
//! | `party_orders` | `(user_id, order_id)` | `PartyRole` as u8 | Per-user order listing |
//! | `processed_commands` | `command_id` | `()` | Idempotency check |
//! | `order_sequence` | `"seq"` | `u64` | Global event sequence |

use redb::{
    Database, ReadableDatabase, ReadableTable, ReadableTableMetadata, TableDefinition,
    WriteTransaction,
};
use shared::order::{OrderEvent, OrderSnapshot, PartyRole};
use std::sync::Arc;

use crate::db::StorageResult;

/// key = (order_id, sequence), value = JSON-serialized OrderEvent
const EVENTS_TABLE: TableDefinition<(&str, u64), &[u8]> = TableDefinition::new("order_events");

/// key = order_id, value = JSON-serialized OrderSnapshot
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// key = order_code, value = order_id
const ORDER_CODES_TABLE: TableDefinition<&str, &str> = TableDefinition::new("order_codes");

/// key = payment reference (checkout session / payment intent), value = order_id
const PAYMENT_REFS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("payment_refs");

/// key = (user_id, order_id), value = role of the user on that order
const PARTY_ORDERS_TABLE: TableDefinition<(&str, &str), u8> = TableDefinition::new("party_orders");

/// key = command_id, value = empty (idempotency)
const PROCESSED_COMMANDS_TABLE: TableDefinition<&str, ()> =
    TableDefinition::new("processed_commands");

/// key = "seq", value = u64
const SEQUENCE_TABLE: TableDefinition<&str, u64> = TableDefinition::new("order_sequence");

const SEQUENCE_KEY: &str = "seq";

const ROLE_BUYER: u8 = 0;
const ROLE_SELLER: u8 = 1;

fn role_to_u8(role: PartyRole) -> u8 {
    match role {
        PartyRole::Buyer => ROLE_BUYER,
        PartyRole::Seller => ROLE_SELLER,
    }
}

fn role_from_u8(value: u8) -> PartyRole {
    if value == ROLE_SELLER {
        PartyRole::Seller
    } else {
        PartyRole::Buyer
    }
}

/// Storage statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct StorageStats {
    pub event_count: u64,
    pub order_count: u64,
    pub current_sequence: u64,
}

/// Order storage backed by redb
#[derive(Clone)]
pub struct OrderStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for OrderStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderStorage").finish_non_exhaustive()
    }
}

impl OrderStorage {
    /// Wrap the shared database and create all order tables
    pub fn new(db: Arc<Database>) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(EVENTS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ORDER_CODES_TABLE)?;
            let _ = write_txn.open_table(PAYMENT_REFS_TABLE)?;
            let _ = write_txn.open_table(PARTY_ORDERS_TABLE)?;
            let _ = write_txn.open_table(PROCESSED_COMMANDS_TABLE)?;

            // Initialize sequence counter if not exists
            let mut seq_table = write_txn.open_table(SEQUENCE_TABLE)?;
            if seq_table.get(SEQUENCE_KEY)?.is_none() {
                seq_table.insert(SEQUENCE_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;

        Ok(Self { db })
    }

    /// Open a standalone in-memory store (for testing)
    #[cfg(test)]
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::new(crate::db::open_in_memory()?)
    }

    /// Begin a write transaction
    ///
    /// The catalog and account stores share the same database, so their
    /// `*_txn` methods can join this transaction.
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Sequence Operations ==========

    /// Current sequence inside a transaction
    pub fn current_sequence_txn(&self, txn: &WriteTransaction) -> StorageResult<u64> {
        let table = txn.open_table(SEQUENCE_TABLE)?;
        Ok(table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    /// Get current sequence (read-only)
    pub fn get_current_sequence(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SEQUENCE_TABLE)?;
        Ok(table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    /// Set sequence number (within transaction)
    pub fn set_sequence(&self, txn: &WriteTransaction, sequence: u64) -> StorageResult<()> {
        let mut table = txn.open_table(SEQUENCE_TABLE)?;
        table.insert(SEQUENCE_KEY, sequence)?;
        Ok(())
    }

    // ========== Idempotency ==========

    pub fn is_command_processed(&self, command_id: &str) -> StorageResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        Ok(table.get(command_id)?.is_some())
    }

    /// Check inside the write transaction, closing the race between two
    /// deliveries of the same command
    pub fn is_command_processed_txn(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
    ) -> StorageResult<bool> {
        let table = txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        Ok(table.get(command_id)?.is_some())
    }

    pub fn mark_command_processed(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        table.insert(command_id, ())?;
        Ok(())
    }

    // ========== Events ==========

    pub fn store_event(&self, txn: &WriteTransaction, event: &OrderEvent) -> StorageResult<()> {
        let mut table = txn.open_table(EVENTS_TABLE)?;
        let key = (event.order_id.as_str(), event.sequence);
        let value = serde_json::to_vec(event)?;
        table.insert(key, value.as_slice())?;
        Ok(())
    }

    /// All events of one order in sequence order
    pub fn get_events_for_order(&self, order_id: &str) -> StorageResult<Vec<OrderEvent>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EVENTS_TABLE)?;

        let mut events = Vec::new();
        let range_start = (order_id, 0u64);
        let range_end = (order_id, u64::MAX);

        for result in table.range(range_start..=range_end)? {
            let (_key, value) = result?;
            let event: OrderEvent = serde_json::from_slice(value.value())?;
            events.push(event);
        }

        events.sort_by_key(|e| e.sequence);
        Ok(events)
    }

    // ========== Orders ==========

    pub fn store_snapshot(
        &self,
        txn: &WriteTransaction,
        snapshot: &OrderSnapshot,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(snapshot)?;
        table.insert(snapshot.order_id.as_str(), value.as_slice())?;
        Ok(())
    }

    pub fn get_snapshot(&self, order_id: &str) -> StorageResult<Option<OrderSnapshot>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Read an order inside the write transaction (guard evaluation)
    pub fn get_snapshot_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<OrderSnapshot>> {
        let table = txn.open_table(ORDERS_TABLE)?;

        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn get_all_snapshots(&self) -> StorageResult<Vec<OrderSnapshot>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut snapshots = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            snapshots.push(serde_json::from_slice(value.value())?);
        }
        Ok(snapshots)
    }

    // ========== Indexes ==========

    /// Order codes are globally unique; true when already taken
    pub fn order_code_exists_txn(&self, txn: &WriteTransaction, code: &str) -> StorageResult<bool> {
        let table = txn.open_table(ORDER_CODES_TABLE)?;
        Ok(table.get(code)?.is_some())
    }

    pub fn index_order_code(
        &self,
        txn: &WriteTransaction,
        code: &str,
        order_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(ORDER_CODES_TABLE)?;
        table.insert(code, order_id)?;
        Ok(())
    }

    pub fn find_order_by_code(&self, code: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDER_CODES_TABLE)?;
        Ok(table.get(code)?.map(|guard| guard.value().to_string()))
    }

    pub fn index_payment_reference(
        &self,
        txn: &WriteTransaction,
        reference: &str,
        order_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PAYMENT_REFS_TABLE)?;
        table.insert(reference, order_id)?;
        Ok(())
    }

    pub fn find_order_by_payment_reference(&self, reference: &str) -> StorageResult<Option<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PAYMENT_REFS_TABLE)?;
        Ok(table.get(reference)?.map(|guard| guard.value().to_string()))
    }

    pub fn index_party(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
        order_id: &str,
        role: PartyRole,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PARTY_ORDERS_TABLE)?;
        table.insert((user_id, order_id), role_to_u8(role))?;
        Ok(())
    }

    /// Orders in which `user_id` takes part, optionally restricted to one role
    pub fn get_orders_for_party(
        &self,
        user_id: &str,
        role: Option<PartyRole>,
    ) -> StorageResult<Vec<OrderSnapshot>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(PARTY_ORDERS_TABLE)?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;

        let mut snapshots = Vec::new();
        for result in index.range((user_id, "")..)? {
            let (key, value) = result?;
            let (owner, order_id) = key.value();
            if owner != user_id {
                break;
            }
            if role.is_some_and(|r| r != role_from_u8(value.value())) {
                continue;
            }
            if let Some(raw) = orders.get(order_id)? {
                snapshots.push(serde_json::from_slice(raw.value())?);
            }
        }
        Ok(snapshots)
    }

    // ========== Statistics ==========

    pub fn get_stats(&self) -> StorageResult<StorageStats> {
        let read_txn = self.db.begin_read()?;
        let events = read_txn.open_table(EVENTS_TABLE)?;
        let orders = read_txn.open_table(ORDERS_TABLE)?;
        let seq = read_txn.open_table(SEQUENCE_TABLE)?;

        Ok(StorageStats {
            event_count: events.len()?,
            order_count: orders.len()?,
            current_sequence: seq
                .get(SEQUENCE_KEY)?
                .map(|guard| guard.value())
                .unwrap_or(0),
        })
    }
}
