use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Json, Router,
};
use biene_core_contact_contracts::{ContactFeatureService, ContactSubmitError, ContactSubmitted};
use biene_shared_contracts::rate_limit::RateLimitService;
use tracing::{info, warn};

use super::{error, message};
use crate::{
    extractors::body::{JsonOrForm, JsonOrFormRejection},
    middlewares::rate_limit,
    models::{contact::ApiContactSubmission, ApiResponse},
};

const RATE_LIMITED: &str = "Zu viele Anfragen. Bitte versuchen Sie es in einer Minute erneut.";

pub fn router(
    service: Arc<impl ContactFeatureService>,
    limiter: Arc<impl RateLimitService>,
) -> Router<()> {
    let router = Router::new()
        .route("/contact", routing::post(submit))
        .with_state(service);
    rate_limit::add_to_routes(router, limiter, RATE_LIMITED)
}

async fn submit(
    service: State<Arc<impl ContactFeatureService>>,
    body: Result<JsonOrForm<ApiContactSubmission>, JsonOrFormRejection>,
) -> Response {
    let JsonOrForm(submission) = match body {
        Ok(body) => body,
        Err(rejection) => {
            warn!(%rejection, "invalid contact request body");
            return match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => {
                    error(StatusCode::PAYLOAD_TOO_LARGE, "Anfrage ist zu groß")
                }
                _ => error(StatusCode::BAD_REQUEST, "Ungültige Anfrage"),
            };
        }
    };

    info!("new contact request");

    match service.submit(submission.into()).await {
        Ok(ContactSubmitted::Delivered) => message(
            StatusCode::OK,
            "Vielen Dank für Ihre Nachricht! Wir melden uns in Kürze bei Ihnen.",
        ),
        Ok(ContactSubmitted::Discarded) => {
            message(StatusCode::OK, "Nachricht wurde erfolgreich gesendet")
        }
        Err(ContactSubmitError::Suspicious) => error(
            StatusCode::BAD_REQUEST,
            "Ihre Eingabe enthält nicht erlaubte Zeichen",
        ),
        Err(ContactSubmitError::Invalid(errors)) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse {
                errors: Some(errors),
                ..ApiResponse::error("Bitte überprüfen Sie Ihre Eingaben")
            }),
        )
            .into_response(),
        Err(err @ (ContactSubmitError::Send | ContactSubmitError::Other(_))) => {
            tracing::error!("Failed to process contact request: {err:?}");
            error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Beim Senden Ihrer Nachricht ist ein Fehler aufgetreten. Bitte versuchen Sie es \
                 später erneut oder kontaktieren Sie uns telefonisch.",
            )
        }
    }
}
