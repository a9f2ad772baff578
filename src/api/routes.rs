//! API Routes
//!
//! HTTP endpoint definitions.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::Sprinkle;
use crate::error::AppError;
use crate::service::SprinkleService;

use super::middleware::RequestIdentity;

// =========================================================================
// Request/Response types
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSprinkleRequest {
    pub amount: i64,
    pub size: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateSprinkleResponse {
    pub token: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PickSprinkleResponse {
    pub amount: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChunkStatus {
    pub amount: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claimed_by: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SprinkleStatusResponse {
    pub token: String,
    pub desired_amount: i64,
    pub claimed_total: i64,
    pub created_at: DateTime<Utc>,
    pub chunks: Vec<ChunkStatus>,
}

impl From<Sprinkle> for SprinkleStatusResponse {
    fn from(sprinkle: Sprinkle) -> Self {
        Self {
            token: sprinkle.token,
            desired_amount: sprinkle.desired_amount,
            claimed_total: sprinkle.claimed_total,
            created_at: sprinkle.created_at,
            chunks: sprinkle
                .chunks
                .into_iter()
                .map(|chunk| ChunkStatus {
                    amount: chunk.amount,
                    claimed_by: chunk.claimed_by,
                })
                .collect(),
        }
    }
}

// =========================================================================
// API Router
// =========================================================================

/// Create the API router
pub fn create_router() -> Router<Arc<SprinkleService>> {
    Router::new()
        .route("/sprinkles", post(create_sprinkle))
        .route("/sprinkles/:token", get(get_sprinkle))
        .route("/sprinkles/:token/pick", post(pick_sprinkle))
}

// =========================================================================
// Handlers
// =========================================================================

/// POST /sprinkles — split an amount into chunks and publish its token.
async fn create_sprinkle(
    State(service): State<Arc<SprinkleService>>,
    Extension(identity): Extension<RequestIdentity>,
    Json(req): Json<CreateSprinkleRequest>,
) -> Result<Json<CreateSprinkleResponse>, AppError> {
    let sprinkle = service.create(
        identity.user_id,
        &identity.room_id,
        req.amount,
        req.size,
        None,
    )?;
    Ok(Json(CreateSprinkleResponse {
        token: sprinkle.token,
    }))
}

/// GET /sprinkles/:token — current state, owner only.
async fn get_sprinkle(
    State(service): State<Arc<SprinkleService>>,
    Extension(identity): Extension<RequestIdentity>,
    Path(token): Path<String>,
) -> Result<Json<SprinkleStatusResponse>, AppError> {
    let sprinkle = service.get(identity.user_id, &identity.room_id, &token)?;
    Ok(Json(sprinkle.into()))
}

/// POST /sprinkles/:token/pick — claim one chunk.
async fn pick_sprinkle(
    State(service): State<Arc<SprinkleService>>,
    Extension(identity): Extension<RequestIdentity>,
    Path(token): Path<String>,
) -> Result<Json<PickSprinkleResponse>, AppError> {
    let amount = service
        .pick(identity.user_id, &identity.room_id, &token)
        .await?;
    Ok(Json(PickSprinkleResponse { amount }))
}
