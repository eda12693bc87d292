use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use biene_core_health_contracts::{HealthFeatureService, HealthStatus};
use biene_shared_contracts::time::TimeService;

use super::message;
use crate::models::ApiHealth;

pub fn router(time: Arc<impl TimeService>, health: Arc<impl HealthFeatureService>) -> Router<()> {
    Router::new()
        .route("/health", routing::get(liveness))
        .with_state(time)
        .merge(
            Router::new()
                .route("/contact/health", routing::get(smtp))
                .with_state(health),
        )
}

async fn liveness(time: State<Arc<impl TimeService>>) -> Response {
    Json(ApiHealth {
        success: true,
        message: "Backend läuft",
        timestamp: time.now(),
    })
    .into_response()
}

async fn smtp(health: State<Arc<impl HealthFeatureService>>) -> Response {
    let HealthStatus { email } = health.get_status().await;

    if email {
        message(StatusCode::OK, "SMTP-Verbindung OK")
    } else {
        message(
            StatusCode::SERVICE_UNAVAILABLE,
            "SMTP-Verbindung fehlgeschlagen",
        )
    }
}
