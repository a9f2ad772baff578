//! Common test utilities

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};

use sprinkle_api::api;
use sprinkle_api::{ExpiryPolicy, RoomDirectory, SprinkleService, SprinkleStore};

/// Build a service whose room `room_id` is seeded with `member_ids`.
pub fn setup_service(room_id: &str, member_ids: &[i64]) -> Arc<SprinkleService> {
    let rooms = Arc::new(RoomDirectory::new());
    for &user_id in member_ids {
        rooms.join(room_id, user_id);
    }
    Arc::new(SprinkleService::new(
        Arc::new(SprinkleStore::new()),
        rooms,
        ExpiryPolicy::default(),
        Duration::from_secs(2),
    ))
}

/// Assemble the app the way the binary does: API routes behind the identity
/// middleware, backed by `service`.
pub fn setup_app(service: Arc<SprinkleService>) -> Router {
    api::create_router()
        .layer(middleware::from_fn(api::middleware::identity_middleware))
        .with_state(service)
}
