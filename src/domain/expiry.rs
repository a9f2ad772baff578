//! Expiry policy
//!
//! Two independent, lazily-evaluated time windows per sprinkle: a short
//! configurable claim window and a fixed 7-day read window. Both are pure
//! predicates over stored timestamps and a caller-supplied `now`; nothing is
//! scheduled and nothing is deleted on expiry.

use chrono::{DateTime, Duration, Utc};

/// Default claim window in minutes.
pub const DEFAULT_CLAIM_WINDOW_MINUTES: i64 = 10;

/// Fixed read window in days, not configurable.
pub const READ_WINDOW_DAYS: i64 = 7;

/// Policy computing the claim deadline for newly created sprinkles.
///
/// The claim window is configurable per creation call; tests use a zero
/// window to construct already-expired sprinkles.
#[derive(Debug, Clone, Copy)]
pub struct ExpiryPolicy {
    claim_window: Duration,
}

impl ExpiryPolicy {
    pub fn new(claim_window: Duration) -> Self {
        Self { claim_window }
    }

    pub fn claim_window(&self) -> Duration {
        self.claim_window
    }

    /// Claim deadline for a sprinkle created at `created_at`.
    pub fn claim_deadline(&self, created_at: DateTime<Utc>) -> DateTime<Utc> {
        created_at + self.claim_window
    }
}

impl Default for ExpiryPolicy {
    fn default() -> Self {
        Self::new(Duration::minutes(DEFAULT_CLAIM_WINDOW_MINUTES))
    }
}

/// End of the read window for a sprinkle created at `created_at`.
pub fn read_deadline(created_at: DateTime<Utc>) -> DateTime<Utc> {
    created_at + Duration::days(READ_WINDOW_DAYS)
}
