//! Sprinkle aggregate
//!
//! One sprinkling event: a fixed pool of chunks created in a single step and
//! thereafter only ever mutated one chunk at a time, unclaimed -> claimed.
//! The aggregate exposes predicates and the claim mutation but enforces no
//! concurrency of its own; `claim_one` is only safe to call while holding the
//! store's exclusive lock for this aggregate.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::expiry::read_deadline;

/// One indivisible share of the sprinkled amount.
///
/// Chunks are values owned positionally by their aggregate; they carry no
/// identity of their own and no reference back to the parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Share amount, always >= 1.
    pub amount: i64,

    /// User who claimed this chunk, if any. Transitions from `None` to
    /// `Some` at most once and never back.
    pub claimed_by: Option<i64>,
}

/// Sprinkle aggregate.
///
/// # Invariants
/// - chunk amounts sum to `desired_amount` for the aggregate's lifetime
/// - every chunk amount is >= 1
/// - a user id appears as `claimed_by` on at most one chunk
/// - `claimed_total` equals the sum of claimed chunk amounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprinkle {
    /// Unique sprinkle ID.
    pub id: Uuid,

    /// Creator; never allowed to claim from their own sprinkle.
    pub owner_id: i64,

    /// Room this sprinkle was shared into.
    pub room_id: String,

    /// Public handle, unique per room.
    pub token: String,

    /// Total amount sprinkled.
    pub desired_amount: i64,

    /// Cached sum of claimed chunk amounts.
    pub claimed_total: i64,

    /// Fixed-length chunk pool, populated once at creation.
    pub chunks: Vec<Chunk>,

    /// When the sprinkle was created.
    pub created_at: DateTime<Utc>,

    /// End of the claim window.
    pub claim_deadline: DateTime<Utc>,
}

impl Sprinkle {
    /// Build a fully-populated sprinkle from the split generator's shares.
    pub fn new(
        owner_id: i64,
        room_id: impl Into<String>,
        token: String,
        desired_amount: i64,
        shares: Vec<i64>,
        created_at: DateTime<Utc>,
        claim_deadline: DateTime<Utc>,
    ) -> Self {
        let chunks = shares
            .into_iter()
            .map(|amount| Chunk {
                amount,
                claimed_by: None,
            })
            .collect();

        Self {
            id: Uuid::new_v4(),
            owner_id,
            room_id: room_id.into(),
            token,
            desired_amount,
            claimed_total: 0,
            chunks,
            created_at,
            claim_deadline,
        }
    }

    pub fn is_owner(&self, user_id: i64) -> bool {
        self.owner_id == user_id
    }

    /// Whether the claim window has elapsed.
    pub fn is_claim_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.claim_deadline
    }

    /// Whether the sprinkle is still within its 7-day read window.
    pub fn is_readable(&self, now: DateTime<Utc>) -> bool {
        now < read_deadline(self.created_at)
    }

    /// Whether `user_id` has already claimed a chunk of this sprinkle.
    pub fn has_claimed(&self, user_id: i64) -> bool {
        self.chunks
            .iter()
            .any(|chunk| chunk.claimed_by == Some(user_id))
    }

    /// Assign the first unclaimed chunk (in stored order) to `user_id` and
    /// return its amount, or `None` when the pool is exhausted.
    ///
    /// Does not touch `claimed_total`; the coordinator updates the cached
    /// total as part of the persisted claim.
    pub fn claim_one(&mut self, user_id: i64) -> Option<i64> {
        for chunk in &mut self.chunks {
            if chunk.claimed_by.is_none() {
                chunk.claimed_by = Some(user_id);
                return Some(chunk.amount);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample(shares: Vec<i64>) -> Sprinkle {
        let now = Utc::now();
        let total = shares.iter().sum();
        Sprinkle::new(1, "room1", "abc".to_string(), total, shares, now, now + Duration::minutes(10))
    }

    #[test]
    fn test_new_populates_unclaimed_chunks() {
        let sprinkle = sample(vec![450, 700, 850]);
        assert_eq!(sprinkle.desired_amount, 2000);
        assert_eq!(sprinkle.claimed_total, 0);
        assert_eq!(sprinkle.chunks.len(), 3);
        assert!(sprinkle.chunks.iter().all(|c| c.claimed_by.is_none()));
    }

    #[test]
    fn test_claim_one_follows_stored_order() {
        let mut sprinkle = sample(vec![450, 700, 850]);
        assert_eq!(sprinkle.claim_one(10), Some(450));
        assert_eq!(sprinkle.claim_one(11), Some(700));
        assert_eq!(sprinkle.claim_one(12), Some(850));
        assert_eq!(sprinkle.claim_one(13), None);
    }

    #[test]
    fn test_has_claimed_scans_chunks() {
        let mut sprinkle = sample(vec![100, 200]);
        assert!(!sprinkle.has_claimed(10));
        sprinkle.claim_one(10);
        assert!(sprinkle.has_claimed(10));
        assert!(!sprinkle.has_claimed(11));
    }

    #[test]
    fn test_is_owner() {
        let sprinkle = sample(vec![100, 200]);
        assert!(sprinkle.is_owner(1));
        assert!(!sprinkle.is_owner(2));
    }

    #[test]
    fn test_claim_window_boundaries() {
        let sprinkle = sample(vec![100, 200]);
        assert!(!sprinkle.is_claim_expired(sprinkle.created_at));
        assert!(!sprinkle.is_claim_expired(sprinkle.claim_deadline - Duration::seconds(1)));
        assert!(sprinkle.is_claim_expired(sprinkle.claim_deadline));
        assert!(sprinkle.is_claim_expired(sprinkle.claim_deadline + Duration::minutes(1)));
    }

    #[test]
    fn test_read_window_is_independent_of_claim_window() {
        let now = Utc::now();
        // Claim window already elapsed; reads still allowed for 7 days.
        let mut sprinkle = sample(vec![100, 200]);
        sprinkle.created_at = now;
        sprinkle.claim_deadline = now;
        assert!(sprinkle.is_claim_expired(now));
        assert!(sprinkle.is_readable(now));
        assert!(sprinkle.is_readable(now + Duration::days(7) - Duration::seconds(1)));
        assert!(!sprinkle.is_readable(now + Duration::days(7)));
    }
}
