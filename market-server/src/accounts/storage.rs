//! redb-based user profile store
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `users` | `user_id` | `UserProfile` (JSON) | Seller capability, presence and seller stats |

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction};
use shared::models::{SellerStats, UserProfile, UserProfileUpdate};
use std::collections::HashMap;
use std::sync::Arc;

use crate::db::StorageResult;

/// key = user id (JWT subject), value = JSON-serialized UserProfile
const USERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("users");

/// User profile storage backed by redb
#[derive(Clone)]
pub struct AccountStorage {
    db: Arc<Database>,
}

impl std::fmt::Debug for AccountStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountStorage").finish_non_exhaustive()
    }
}

impl AccountStorage {
    pub fn new(db: Arc<Database>) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(USERS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db })
    }

    pub fn get_user(&self, user_id: &str) -> StorageResult<Option<UserProfile>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS_TABLE)?;
        match table.get(user_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Profiles for a set of ids from one read snapshot; missing ids are skipped
    pub fn get_users<'a>(
        &self,
        user_ids: impl IntoIterator<Item = &'a str>,
    ) -> StorageResult<HashMap<String, UserProfile>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(USERS_TABLE)?;

        let mut users = HashMap::new();
        for id in user_ids {
            if users.contains_key(id) {
                continue;
            }
            if let Some(value) = table.get(id)? {
                let profile: UserProfile = serde_json::from_slice(value.value())?;
                users.insert(id.to_string(), profile);
            }
        }
        Ok(users)
    }

    pub fn put_user(&self, profile: &UserProfile) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        self.put_user_txn(&txn, profile)?;
        txn.commit()?;
        Ok(())
    }

    /// Create the profile on first sight, otherwise apply the editable fields.
    ///
    /// Stats and `is_pro` are never touched here.
    pub fn upsert_profile(
        &self,
        user_id: &str,
        default_username: &str,
        update: &UserProfileUpdate,
        now: i64,
    ) -> StorageResult<UserProfile> {
        let txn = self.db.begin_write()?;
        let mut profile = self
            .get_user_txn(&txn, user_id)?
            .unwrap_or_else(|| UserProfile::new(user_id, default_username, now));

        if let Some(username) = &update.username {
            profile.username = username.trim().to_string();
        }
        if let Some(is_seller) = update.is_seller {
            profile.is_seller = is_seller;
        }
        profile.last_seen = now;

        self.put_user_txn(&txn, &profile)?;
        txn.commit()?;
        Ok(profile)
    }

    /// Record presence for the online filter; no-op for unknown users
    pub fn touch_last_seen(&self, user_id: &str, now: i64) -> StorageResult<()> {
        let txn = self.db.begin_write()?;
        if let Some(mut profile) = self.get_user_txn(&txn, user_id)? {
            profile.last_seen = now;
            self.put_user_txn(&txn, &profile)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Overwrite the order counters (recompute from the order store)
    pub fn set_order_counters(
        &self,
        user_id: &str,
        ongoing_orders: u64,
        completed_orders: u64,
    ) -> StorageResult<Option<SellerStats>> {
        let txn = self.db.begin_write()?;
        let Some(mut profile) = self.get_user_txn(&txn, user_id)? else {
            return Ok(None);
        };
        profile.stats.ongoing_orders = ongoing_orders;
        profile.stats.completed_orders = completed_orders;
        self.put_user_txn(&txn, &profile)?;
        txn.commit()?;
        Ok(Some(profile.stats))
    }

    // ========== In-transaction operations (order pipeline) ==========

    pub fn get_user_txn(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
    ) -> StorageResult<Option<UserProfile>> {
        let table = txn.open_table(USERS_TABLE)?;
        match table.get(user_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    pub fn put_user_txn(&self, txn: &WriteTransaction, profile: &UserProfile) -> StorageResult<()> {
        let mut table = txn.open_table(USERS_TABLE)?;
        let value = serde_json::to_vec(profile)?;
        table.insert(profile.id.as_str(), value.as_slice())?;
        Ok(())
    }

    fn modify_stats_txn(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
        f: impl FnOnce(&mut SellerStats),
    ) -> StorageResult<bool> {
        let Some(mut profile) = self.get_user_txn(txn, user_id)? else {
            return Ok(false);
        };
        f(&mut profile.stats);
        self.put_user_txn(txn, &profile)?;
        Ok(true)
    }

    /// `stats.ongoing_orders += delta`, floored at zero
    pub fn adjust_ongoing_txn(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
        delta: i64,
    ) -> StorageResult<bool> {
        self.modify_stats_txn(txn, user_id, |stats| {
            stats.ongoing_orders = stats.ongoing_orders.saturating_add_signed(delta);
        })
    }

    pub fn increment_completed_txn(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
    ) -> StorageResult<bool> {
        self.modify_stats_txn(txn, user_id, |stats| stats.completed_orders += 1)
    }

    pub fn record_review_txn(
        &self,
        txn: &WriteTransaction,
        user_id: &str,
        rating: u8,
    ) -> StorageResult<bool> {
        self.modify_stats_txn(txn, user_id, |stats| stats.record_review(rating))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn storage() -> AccountStorage {
        AccountStorage::new(crate::db::open_in_memory().unwrap()).unwrap()
    }

    #[test]
    fn test_upsert_creates_then_updates() {
        let storage = storage();
        let update = UserProfileUpdate {
            username: None,
            is_seller: Some(true),
        };
        let created = storage.upsert_profile("u1", "alice", &update, 100).unwrap();
        assert_eq!(created.username, "alice");
        assert!(created.is_seller);
        assert_eq!(created.created_at, 100);

        let update = UserProfileUpdate {
            username: Some("  alice_b ".to_string()),
            is_seller: None,
        };
        let updated = storage.upsert_profile("u1", "ignored", &update, 200).unwrap();
        assert_eq!(updated.username, "alice_b");
        assert!(updated.is_seller);
        assert_eq!(updated.created_at, 100);
        assert_eq!(updated.last_seen, 200);
    }

    #[test]
    fn test_ongoing_counter_never_underflows() {
        let storage = storage();
        storage.put_user(&UserProfile::new("s1", "seller", 0)).unwrap();

        let txn = storage.db.begin_write().unwrap();
        assert!(storage.adjust_ongoing_txn(&txn, "s1", 1).unwrap());
        assert!(storage.adjust_ongoing_txn(&txn, "s1", -1).unwrap());
        assert!(storage.adjust_ongoing_txn(&txn, "s1", -1).unwrap());
        assert!(storage.increment_completed_txn(&txn, "s1").unwrap());
        assert!(storage.record_review_txn(&txn, "s1", 3).unwrap());
        assert!(!storage.adjust_ongoing_txn(&txn, "ghost", 1).unwrap());
        txn.commit().unwrap();

        let stats = storage.get_user("s1").unwrap().unwrap().stats;
        assert_eq!(stats.ongoing_orders, 0);
        assert_eq!(stats.completed_orders, 1);
        assert_eq!(stats.total_rating, Decimal::from(3));
    }

    #[test]
    fn test_get_users_skips_missing() {
        let storage = storage();
        storage.put_user(&UserProfile::new("a", "a", 0)).unwrap();
        storage.put_user(&UserProfile::new("b", "b", 0)).unwrap();

        let users = storage.get_users(["a", "b", "a", "zzz"]).unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.contains_key("b"));
    }

    #[test]
    fn test_touch_last_seen_ignores_unknown() {
        let storage = storage();
        storage.touch_last_seen("nobody", 5).unwrap();
        assert!(storage.get_user("nobody").unwrap().is_none());

        storage.put_user(&UserProfile::new("u", "u", 0)).unwrap();
        storage.touch_last_seen("u", 5).unwrap();
        assert_eq!(storage.get_user("u").unwrap().unwrap().last_seen, 5);
    }
}
