//! redb-based gig catalog
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `gigs` | `gig_id` | `Gig` (JSON) | Gig records including stats |
//!
//! Seller edits go through [`CatalogStorage::modify_gig`], which reads and
//! writes inside one write transaction so a concurrent stats increment from
//! the order pipeline is never lost.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::models::Gig;
use std::sync::Arc;

use crate::db::{StorageError, StorageResult};

/// key = gig id, value = JSON-serialized Gig
const GIGS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("gigs");

/// Gig storage backed by redb
#[derive(Clone)]
pub struct CatalogStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for CatalogStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogStorage").finish_non_exhaustive()
    }
}

impl CatalogStorage {
    /// Wrap the shared database and make sure the table exists
    pub fn new(db: Arc<Database>) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(GIGS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db })
    }

    // ========== Reads ==========

    pub fn get_gig(&self, gig_id: i64) -> StorageResult<Option<Gig>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(GIGS_TABLE)?;
        match table.get(gig_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Every gig, listable or not, in key order
    pub fn all_gigs(&self) -> StorageResult<Vec<Gig>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(GIGS_TABLE)?;

        let mut gigs = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            gigs.push(serde_json::from_slice(value.value())?);
        }
        Ok(gigs)
    }

    /// Gigs eligible for search and browse (`is_active && !is_paused`)
    pub fn listable_gigs(&self) -> StorageResult<Vec<Gig>> {
        Ok(self
            .all_gigs()?
            .into_iter()
            .filter(Gig::is_listable)
            .collect())
    }

    pub fn gigs_by_seller(&self, seller_id: &str) -> StorageResult<Vec<Gig>> {
        Ok(self
            .all_gigs()?
            .into_iter()
            .filter(|g| g.seller_id == seller_id)
            .collect())
    }

    // ========== Writes ==========

    /// Insert or overwrite a gig
    pub fn put_gig(&self, gig: &Gig) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        self.put_gig_txn(&txn, gig)?;
        txn.commit()?;
        Ok(())
    }

    /// Hard delete; returns whether a record was removed
    pub fn delete_gig(&self, gig_id: i64) -> StorageResult<bool> {
        let txn = self.db.begin_write()?;
        let removed = {
            let mut table = txn.open_table(GIGS_TABLE)?;
            table.remove(gig_id)?.is_some()
        };
        txn.commit()?;
        Ok(removed)
    }

    /// Read-modify-write a gig atomically.
    ///
    /// Returns `Ok(None)` when the gig does not exist. If `f` fails nothing is
    /// written.
    pub fn modify_gig<F, E>(&self, gig_id: i64, f: F) -> Result<Option<Gig>, E>
    where
        F: FnOnce(&mut Gig) -> Result<(), E>,
        E: From<StorageError>,
    {
        let txn = self.db.begin_write().map_err(StorageError::from)?;
        let Some(mut gig) = self.get_gig_txn(&txn, gig_id)? else {
            return Ok(None);
        };
        f(&mut gig)?;
        self.put_gig_txn(&txn, &gig)?;
        txn.commit().map_err(StorageError::from)?;
        Ok(Some(gig))
    }

    // ========== In-transaction operations (order pipeline) ==========

    pub fn get_gig_txn(&self, txn: &WriteTransaction, gig_id: i64) -> StorageResult<Option<Gig>> {
        let table = txn.open_table(GIGS_TABLE)?;
        match table.get(gig_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn put_gig_txn(&self, txn: &WriteTransaction, gig: &Gig) -> StorageResult<()> {
        let mut table = txn.open_table(GIGS_TABLE)?;
        let value = serde_json::to_vec(gig)?;
        table.insert(gig.id, value.as_slice())?;
        Ok(())
    }

    /// `stats.total_orders += 1`; returns false when the gig is gone
    pub fn increment_total_orders_txn(
        &self,
        txn: &WriteTransaction,
        gig_id: i64,
    ) -> StorageResult<bool> {
        let Some(mut gig) = self.get_gig_txn(txn, gig_id)? else {
            return Ok(false);
        };
        gig.stats.total_orders += 1;
        self.put_gig_txn(txn, &gig)?;
        Ok(true)
    }

    /// Fold a review into the gig rating aggregate; returns false when the gig is gone
    pub fn record_review_txn(
        &self,
        txn: &WriteTransaction,
        gig_id: i64,
        rating: u8,
    ) -> StorageResult<bool> {
        let Some(mut gig) = self.get_gig_txn(txn, gig_id)? else {
            return Ok(false);
        };
        gig.stats.record_review(rating);
        self.put_gig_txn(txn, &gig)?;
        Ok(true)
    }

    /// Overwrite `stats.total_orders` (recompute from the order store)
    pub fn set_total_orders(&self, gig_id: i64, total_orders: u64) -> StorageResult<bool> {
        let updated = self.modify_gig::<_, StorageError>(gig_id, |gig| {
            gig.stats.total_orders = total_orders;
            Ok(())
        })?;
        Ok(updated.is_some())
    }
}
