use biene_core_contact_contracts::MockContactFeatureService;
use biene_core_health_contracts::{HealthStatus, MockHealthFeatureService};
use chrono::{DateTime, Utc};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::{get, router, send, sut, Clock};

#[tokio::test]
async fn liveness() {
    // Arrange
    let clock = Clock::new();
    let router = sut(
        &clock,
        MockHealthFeatureService::new(),
        MockContactFeatureService::new(),
        &[],
    )
    .router();

    // Act
    let response = send(&router, get("/api/health")).await;

    // Assert
    assert_eq!(response.status, 200);
    assert_eq!(response.body["success"], json!(true));
    assert_eq!(response.body["message"], json!("Backend läuft"));
    let timestamp: DateTime<Utc> =
        serde_json::from_value(response.body["timestamp"].clone()).unwrap();
    assert_eq!(timestamp, clock.now());
}

#[tokio::test]
async fn smtp_reachable() {
    // Arrange
    let health = MockHealthFeatureService::new().with_get_status(HealthStatus { email: true });
    let router = router(health, MockContactFeatureService::new());

    // Act
    let response = send(&router, get("/api/contact/health")).await;

    // Assert
    assert_eq!(response.status, 200);
    assert_eq!(
        response.body,
        json!({"success": true, "message": "SMTP-Verbindung OK"})
    );
}

#[tokio::test]
async fn smtp_unreachable() {
    // Arrange
    let health = MockHealthFeatureService::new().with_get_status(HealthStatus { email: false });
    let router = router(health, MockContactFeatureService::new());

    // Act
    let response = send(&router, get("/api/contact/health")).await;

    // Assert
    assert_eq!(response.status, 503);
    assert_eq!(
        response.body,
        json!({"success": false, "message": "SMTP-Verbindung fehlgeschlagen"})
    );
}

#[tokio::test]
async fn unknown_routes() {
    // Arrange
    let router = router(MockHealthFeatureService::new(), MockContactFeatureService::new());

    for uri in ["/api/unknown", "/unknown", "/", "/api"] {
        // Act
        let response = send(&router, get(uri)).await;

        // Assert
        assert_eq!(response.status, 404, "{uri}");
        assert_eq!(
            response.body,
            json!({"success": false, "error": "Route nicht gefunden"}),
            "{uri}"
        );
    }
}
