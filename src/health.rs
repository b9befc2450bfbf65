//! Health check, used by the dashboard and load balancers

use axum::Extension;
use axum::Json;
use axum::http::StatusCode;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::registry::Registry;
use crate::storage::Storage;

/// Health of the service
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    ok: bool,
    status: &'static str,
    timestamp: DateTime<Utc>,
}

/// Report the health of the service
///
/// The service is healthy when its storage can be reached
///
/// Request:
/// ```sh
/// curl -v http://localhost:6000/healthz
/// ```
///
/// Response
/// ```json
/// { "ok": true, "status": "healthy", "timestamp": "2025-06-01T12:00:00Z" }
/// ```
pub async fn healthz<S: Storage>(
    Extension(registry): Extension<Registry<S>>,
) -> (StatusCode, Json<HealthResponse>) {
    let timestamp = Utc::now();

    match registry.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                ok: true,
                status: "healthy",
                timestamp,
            }),
        ),
        Err(err) => {
            tracing::error!("Health check failed: {err}");

            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    ok: false,
                    status: "unhealthy",
                    timestamp,
                }),
            )
        }
    }
}
