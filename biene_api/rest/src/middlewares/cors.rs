use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, Method, StatusCode},
    middleware::{from_fn_with_state, Next},
    response::Response,
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use crate::routes::error;

/// Answer cross origin requests from `allowed_origins` and reject those from
/// any other origin. Requests without an `Origin` header are always allowed.
pub fn add<S: Clone + Send + Sync + 'static>(router: Router<S>, allowed_origins: &[String]) -> Router<S> {
    let allowed_origins = allowed_origins
        .iter()
        .filter_map(|origin| {
            HeaderValue::from_str(origin)
                .inspect_err(|err| warn!(%origin, "ignoring invalid allowed origin: {err}"))
                .ok()
        })
        .filter(|origin| origin != "*")
        .collect::<Arc<[_]>>();

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed_origins.iter().cloned()))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true);

    router
        .layer(cors)
        .layer(from_fn_with_state(allowed_origins, reject_unknown_origin))
}

async fn reject_unknown_origin(
    State(allowed_origins): State<Arc<[HeaderValue]>>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(origin) = request.headers().get(header::ORIGIN) {
        if !allowed_origins.contains(origin) {
            warn!(?origin, "rejecting request from origin that is not allowed");
            return error(
                StatusCode::FORBIDDEN,
                "CORS-Richtlinie: Anfrage von dieser Origin nicht erlaubt",
            );
        }
    }

    next.run(request).await
}
