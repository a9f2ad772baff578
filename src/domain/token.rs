//! Sprinkle token generation
//!
//! Tokens are the public handle for a sprinkle within a room: short,
//! alphanumeric, practically unguessable. Uniqueness per room is enforced by
//! the store's `(room_id, token)` index, not here; the creation flow retries
//! on conflict.

use rand::distributions::Alphanumeric;
use rand::Rng;

/// Token length required by the public contract.
pub const TOKEN_LENGTH: usize = 3;

/// Generate a random alphanumeric token.
pub fn generate_token<R: Rng + ?Sized>(rng: &mut R) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}
