//! Sprinkle service
//!
//! Orchestrates the three core operations: create, get, pick. `pick` is the
//! concurrency boundary: all chunk mutation happens inside the store's
//! per-sprinkle exclusive lock, against state re-read after the lock is held.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::domain::{generate_token, split_amount, ExpiryPolicy, Sprinkle};
use crate::error::{AppError, AppResult};
use crate::store::{RoomDirectory, SprinkleKey, SprinkleStore};

/// Bounded attempts at finding a free `(room_id, token)` slot before the
/// create call gives up.
const MAX_TOKEN_ATTEMPTS: u32 = 8;

/// Service for sprinkle operations
pub struct SprinkleService {
    store: Arc<SprinkleStore>,
    rooms: Arc<RoomDirectory>,
    expiry: ExpiryPolicy,
    lock_wait: Duration,
}

impl SprinkleService {
    pub fn new(
        store: Arc<SprinkleStore>,
        rooms: Arc<RoomDirectory>,
        expiry: ExpiryPolicy,
        lock_wait: Duration,
    ) -> Self {
        Self {
            store,
            rooms,
            expiry,
            lock_wait,
        }
    }

    pub fn store(&self) -> &SprinkleStore {
        &self.store
    }

    pub fn rooms(&self) -> &RoomDirectory {
        &self.rooms
    }

    /// Create a sprinkle: split `amount` into `size` chunks and publish it
    /// under a fresh token in `room_id`.
    ///
    /// `claim_window` overrides the service-wide claim window; tests pass a
    /// zero duration to construct already-expired sprinkles.
    pub fn create(
        &self,
        owner_id: i64,
        room_id: &str,
        amount: i64,
        size: u32,
        claim_window: Option<chrono::Duration>,
    ) -> AppResult<Sprinkle> {
        if size < 1 {
            return Err(AppError::InvalidParameter("size must be at least 1".into()));
        }
        if amount < i64::from(size) {
            return Err(AppError::InvalidParameter(
                "amount must be at least the chunk count".into(),
            ));
        }

        // Membership oracle: the owner needs company, and there must be more
        // members than chunks (the owner cannot claim their own sprinkle).
        let member_count = self.rooms.member_count(room_id);
        if member_count < 2 || member_count <= size as usize {
            return Err(AppError::BadRequest);
        }

        let mut rng = rand::thread_rng();
        let shares = split_amount(amount, size, &mut rng);

        let now = Utc::now();
        let policy = claim_window.map(ExpiryPolicy::new).unwrap_or(self.expiry);
        let mut sprinkle = Sprinkle::new(
            owner_id,
            room_id,
            generate_token(&mut rng),
            amount,
            shares,
            now,
            policy.claim_deadline(now),
        );

        // Tokens are only 3 characters, so collisions within a room are a
        // real possibility; regenerate on a unique-index conflict, bounded.
        for attempt in 1..=MAX_TOKEN_ATTEMPTS {
            match self.store.insert_new(sprinkle.clone()) {
                Ok(()) => {
                    tracing::info!(
                        room_id = %sprinkle.room_id,
                        token = %sprinkle.token,
                        amount,
                        size,
                        "sprinkle created"
                    );
                    return Ok(sprinkle);
                }
                Err(rejected) => {
                    tracing::warn!(
                        room_id = %rejected.room_id,
                        token = %rejected.token,
                        attempt,
                        "token collision, regenerating"
                    );
                    sprinkle = rejected;
                    sprinkle.token = generate_token(&mut rng);
                }
            }
        }

        Err(AppError::Internal(format!(
            "no free token after {MAX_TOKEN_ATTEMPTS} attempts in room {room_id}"
        )))
    }

    /// Fetch the current state of a sprinkle.
    ///
    /// Owner-only, and only within the 7-day read window. Lock-free: the
    /// snapshot may trail an in-flight pick by one claim.
    pub fn get(&self, user_id: i64, room_id: &str, token: &str) -> AppResult<Sprinkle> {
        let key = SprinkleKey::new(room_id, token);
        let sprinkle = self.store.find(&key).ok_or(AppError::NotFound)?;
        if !sprinkle.is_owner(user_id) {
            return Err(AppError::BadRequest);
        }
        if !sprinkle.is_readable(Utc::now()) {
            return Err(AppError::Expired);
        }
        Ok(sprinkle)
    }

    /// Claim one chunk for `user_id` and return its amount.
    ///
    /// The sequence {re-read, validate, mutate, save} runs under the
    /// sprinkle's exclusive lock. Validation order: ownership, claim window,
    /// prior claim, pool exhaustion; the first violation wins.
    pub async fn pick(&self, user_id: i64, room_id: &str, token: &str) -> AppResult<i64> {
        let key = SprinkleKey::new(room_id, token);
        if self.store.find(&key).is_none() {
            return Err(AppError::NotFound);
        }

        let _guard = self.store.lock_for_update(&key, self.lock_wait).await?;

        // Anything observed before the lock was granted may have been
        // overtaken by a racing claim; only this read can be trusted.
        let mut sprinkle = self.store.find(&key).ok_or(AppError::NotFound)?;

        if sprinkle.is_owner(user_id) {
            return Err(AppError::BadRequest);
        }
        if sprinkle.is_claim_expired(Utc::now()) {
            return Err(AppError::Expired);
        }
        if sprinkle.has_claimed(user_id) {
            return Err(AppError::AlreadyPicked);
        }

        let amount = sprinkle.claim_one(user_id).ok_or(AppError::NoMoreChunks)?;
        sprinkle.claimed_total += amount;
        self.store.save(sprinkle);

        tracing::info!(room_id, token, user_id, amount, "chunk claimed");
        Ok(amount)
    }
}
