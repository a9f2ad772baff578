//! Domain module
//!
//! Core domain types and business logic.

pub mod expiry;
pub mod split;
pub mod sprinkle;
pub mod token;

pub use expiry::ExpiryPolicy;
pub use split::split_amount;
pub use sprinkle::{Chunk, Sprinkle};
pub use token::generate_token;
