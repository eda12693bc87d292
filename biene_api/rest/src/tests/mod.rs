use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::{header, request, HeaderMap, Method, Request, StatusCode},
    Router,
};
use biene_core_contact_contracts::{ContactFeatureService, MockContactFeatureService};
use biene_core_health_contracts::MockHealthFeatureService;
use biene_shared_contracts::time::MockTimeService;
use biene_shared_impl::rate_limit::{RateLimitConfig, RateLimitServiceImpl};
use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use tower::ServiceExt;

use crate::{RestServer, RestServerConfig};

mod health;

type Sut<Contact = MockContactFeatureService> = RestServer<
    MockTimeService,
    MockHealthFeatureService,
    Contact,
    RateLimitServiceImpl<MockTimeService>,
>;

const CLIENT: SocketAddr = SocketAddr::new(IpAddr::V4(Ipv4Addr::new(203, 0, 113, 7)), 54321);
const ORIGIN: &str = "http://localhost:3000";

#[derive(Clone)]
struct Clock(Arc<Mutex<DateTime<Utc>>>);

impl Clock {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(
            Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap(),
        )))
    }

    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }

    fn advance(&self, duration: Duration) {
        *self.0.lock().unwrap() += TimeDelta::from_std(duration).unwrap();
    }

    fn time_service(&self) -> MockTimeService {
        let clock = self.clone();
        let mut time = MockTimeService::new();
        time.expect_now().returning(move || clock.now());
        time
    }
}

fn sut<Contact: ContactFeatureService>(
    clock: &Clock,
    health: MockHealthFeatureService,
    contact: Contact,
    whitelist: &[IpAddr],
) -> Sut<Contact> {
    let rate_limit = |window, max, whitelist: &[IpAddr]| {
        RateLimitServiceImpl::new(
            clock.time_service(),
            RateLimitConfig {
                window,
                max,
                whitelist: whitelist.into(),
            },
        )
    };

    RestServer::new(
        clock.time_service(),
        health,
        contact,
        rate_limit(Duration::from_secs(60), 5, whitelist),
        rate_limit(Duration::from_secs(15 * 60), 100, &[]),
        RestServerConfig {
            allowed_origins: vec![ORIGIN.into()],
            body_limit: 10 * 1024,
            real_ip_config: None,
        },
    )
}

fn router(health: MockHealthFeatureService, contact: MockContactFeatureService) -> Router {
    sut(&Clock::new(), health, contact, &[]).router()
}

fn request(method: Method, uri: &str) -> request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .extension(ConnectInfo(CLIENT))
}

fn get(uri: &str) -> Request<Body> {
    request(Method::GET, uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    request(Method::POST, uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap()
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    /// `Null` if the body is empty
    body: serde_json::Value,
}

async fn send(router: &Router, request: Request<Body>) -> TestResponse {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };

    TestResponse {
        status,
        headers,
        body,
    }
}
