//! User Profile Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::gig::average_rating;

/// A seller counts as online when seen within this window
pub const ONLINE_WINDOW_MILLIS: i64 = 5 * 60 * 1000;

/// Seller counters maintained by the order pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SellerStats {
    pub ongoing_orders: u64,
    pub completed_orders: u64,
    /// Average rating across all reviewed orders, one decimal place
    pub total_rating: Decimal,
    pub total_reviews: u64,
    pub rating_sum: u64,
}

impl SellerStats {
    pub fn record_review(&mut self, rating: u8) {
        self.rating_sum += rating as u64;
        self.total_reviews += 1;
        self.total_rating = average_rating(self.rating_sum, self.total_reviews);
    }
}

/// User profile entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub username: String,
    pub is_seller: bool,
    #[serde(default)]
    pub is_pro: bool,
    /// Unix millis of the last authenticated request
    pub last_seen: i64,
    pub stats: SellerStats,
    pub created_at: i64,
}

impl UserProfile {
    pub fn new(id: impl Into<String>, username: impl Into<String>, now: i64) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            is_seller: false,
            is_pro: false,
            last_seen: now,
            stats: SellerStats::default(),
            created_at: now,
        }
    }

    pub fn is_online(&self, now: i64) -> bool {
        now - self.last_seen <= ONLINE_WINDOW_MILLIS
    }
}

/// Upsert own profile payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfileUpdate {
    pub username: Option<String>,
    pub is_seller: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_online_window() {
        let user = UserProfile::new("u1", "alice", 1_000_000);
        assert!(user.is_online(1_000_000 + ONLINE_WINDOW_MILLIS));
        assert!(!user.is_online(1_000_000 + ONLINE_WINDOW_MILLIS + 1));
    }

    #[test]
    fn test_seller_review_average() {
        let mut stats = SellerStats::default();
        stats.record_review(3);
        stats.record_review(4);
        stats.record_review(4);
        assert_eq!(stats.total_rating.to_string(), "3.7");
    }
}
