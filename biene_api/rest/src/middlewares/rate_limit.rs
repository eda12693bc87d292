use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode},
    middleware::{from_fn_with_state, Next},
    response::Response,
    Router,
};
use biene_shared_contracts::rate_limit::{RateLimitDecision, RateLimitInfo, RateLimitService};
use tracing::warn;

use super::client_ip::ClientIp;
use crate::routes::error;

const RATE_LIMIT_LIMIT: HeaderName = HeaderName::from_static("ratelimit-limit");
const RATE_LIMIT_REMAINING: HeaderName = HeaderName::from_static("ratelimit-remaining");
const RATE_LIMIT_RESET: HeaderName = HeaderName::from_static("ratelimit-reset");

/// Limit every route of `router`, including its fallback.
pub fn add<S, R>(router: Router<S>, service: Arc<R>, message: &'static str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    R: RateLimitService,
{
    router.layer(from_fn_with_state(
        Limiter { service, message },
        middleware::<R>,
    ))
}

/// Limit only the routes that have already been added to `router`.
pub fn add_to_routes<S, R>(router: Router<S>, service: Arc<R>, message: &'static str) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    R: RateLimitService,
{
    router.route_layer(from_fn_with_state(
        Limiter { service, message },
        middleware::<R>,
    ))
}

struct Limiter<R> {
    service: Arc<R>,
    /// Error message of the 429 response
    message: &'static str,
}

impl<R> Clone for Limiter<R> {
    fn clone(&self) -> Self {
        Self {
            service: Arc::clone(&self.service),
            message: self.message,
        }
    }
}

async fn middleware<R: RateLimitService>(
    State(limiter): State<Limiter<R>>,
    request: Request,
    next: Next,
) -> Response {
    let Some(&ClientIp(client_ip)) = request.extensions().get::<ClientIp>() else {
        warn!("client ip missing, skipping rate limit");
        return next.run(request).await;
    };

    match limiter.service.check(client_ip) {
        RateLimitDecision::Exempt => next.run(request).await,
        RateLimitDecision::Allowed(info) => {
            let mut response = next.run(request).await;
            insert_headers(response.headers_mut(), info);
            response
        }
        RateLimitDecision::Limited(info) => {
            warn!(%client_ip, "rate limit exceeded");
            let mut response = error(StatusCode::TOO_MANY_REQUESTS, limiter.message);
            insert_headers(response.headers_mut(), info);
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, reset_seconds(info).into());
            response
        }
    }
}

/// Headers that are already present, e.g. from a more specific limiter
/// further down the stack, are kept.
fn insert_headers(headers: &mut HeaderMap, info: RateLimitInfo) {
    for (name, value) in [
        (RATE_LIMIT_LIMIT, info.limit),
        (RATE_LIMIT_REMAINING, info.remaining),
        (RATE_LIMIT_RESET, reset_seconds(info)),
    ] {
        headers.entry(name).or_insert(HeaderValue::from(value));
    }
}

fn reset_seconds(info: RateLimitInfo) -> u64 {
    let reset = info.reset_after;
    reset.as_secs() + u64::from(reset.subsec_nanos() > 0)
}
