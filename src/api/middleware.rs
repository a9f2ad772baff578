//! API Middleware
//!
//! Caller identity extraction and request logging.

use axum::{
    body::Body,
    http::{HeaderMap, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Header carrying the caller's user id.
pub const X_USER_ID: &str = "X-USER-ID";

/// Header carrying the room the caller is acting in.
pub const X_ROOM_ID: &str = "X-ROOM-ID";

/// Caller identity resolved from request headers.
#[derive(Debug, Clone)]
pub struct RequestIdentity {
    pub user_id: i64,
    pub room_id: String,
}

/// Extract `X-USER-ID` / `X-ROOM-ID` into a `RequestIdentity` extension.
///
/// Both headers are mandatory on every sprinkle endpoint; upstream
/// infrastructure is trusted to have authenticated them.
pub async fn identity_middleware(
    headers: HeaderMap,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let user_id = match headers.get(X_USER_ID).and_then(|v| v.to_str().ok()) {
        Some(raw) => match raw.parse::<i64>() {
            Ok(user_id) => user_id,
            Err(_) => {
                return Err((
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": format!("Invalid {X_USER_ID} header format"),
                        "error_code": "invalid_user_id"
                    })),
                )
                    .into_response());
            }
        },
        None => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": format!("Missing {X_USER_ID} header"),
                    "error_code": "missing_header"
                })),
            )
                .into_response());
        }
    };

    let room_id = match headers.get(X_ROOM_ID).and_then(|v| v.to_str().ok()) {
        Some(room_id) => room_id.to_string(),
        None => {
            return Err((
                StatusCode::BAD_REQUEST,
                Json(json!({
                    "error": format!("Missing {X_ROOM_ID} header"),
                    "error_code": "missing_header"
                })),
            )
                .into_response());
        }
    };

    request
        .extensions_mut()
        .insert(RequestIdentity { user_id, room_id });

    Ok(next.run(request).await)
}

/// Request logging middleware
pub async fn logging_middleware(request: Request<Body>, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let start = std::time::Instant::now();
    let response = next.run(request).await;
    let duration = start.elapsed();

    tracing::info!(
        method = %method,
        uri = %uri,
        status = %response.status(),
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    response
}
