//! sprinkle_api Library
//!
//! Re-exports modules for integration testing and external use.

pub mod api;
pub mod domain;
pub mod service;
pub mod store;

// Private modules (used only by main.rs binary)
pub mod config;
mod error;

pub use config::Config;
pub use domain::{Chunk, ExpiryPolicy, Sprinkle};
pub use error::{AppError, AppResult};
pub use service::SprinkleService;
pub use store::{RoomDirectory, SprinkleKey, SprinkleStore};
