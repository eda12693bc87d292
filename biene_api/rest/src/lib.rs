use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{extract::DefaultBodyLimit, Router};
use biene_core_contact_contracts::ContactFeatureService;
use biene_core_health_contracts::HealthFeatureService;
use biene_shared_contracts::{rate_limit::RateLimitService, time::TimeService};
use biene_utils::Apply;
use tokio::{net::TcpListener, signal};
use tracing::info;

mod extractors;
mod middlewares;
mod models;
mod routes;

#[cfg(test)]
mod tests;

/// Global limiter refusal
const GLOBAL_RATE_LIMITED: &str = "Zu viele Anfragen. Bitte versuchen Sie es später erneut.";

#[derive(Debug, Clone)]
pub struct RestServer<Time, Health, Contact, RateLimit> {
    time: Time,
    health: Health,
    contact: Contact,
    /// Applies to contact form submissions only
    contact_rate_limit: RateLimit,
    /// Applies to every request below `/api`
    global_rate_limit: RateLimit,
    config: RestServerConfig,
}

#[derive(Debug, Clone)]
pub struct RestServerConfig {
    pub allowed_origins: Vec<String>,
    pub body_limit: usize,
    pub real_ip_config: Option<Arc<RealIpConfig>>,
}

/// Trust `header` to contain the client ip if the request comes from
/// `set_from`, e.g. a reverse proxy on the same host.
#[derive(Debug, Clone)]
pub struct RealIpConfig {
    pub header: String,
    pub set_from: IpAddr,
}

impl<Time, Health, Contact, RateLimit> RestServer<Time, Health, Contact, RateLimit>
where
    Time: TimeService,
    Health: HealthFeatureService,
    Contact: ContactFeatureService,
    RateLimit: RateLimitService,
{
    pub fn new(
        time: Time,
        health: Health,
        contact: Contact,
        contact_rate_limit: RateLimit,
        global_rate_limit: RateLimit,
        config: RestServerConfig,
    ) -> Self {
        Self {
            time,
            health,
            contact,
            contact_rate_limit,
            global_rate_limit,
            config,
        }
    }

    /// Serve the api until SIGINT or SIGTERM is received.
    pub async fn serve(self, host: IpAddr, port: u16) -> anyhow::Result<()> {
        let router = self.router();
        let listener = TcpListener::bind((host, port)).await?;
        info!("Listening on {}", listener.local_addr()?);

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        info!("Server shut down");
        Ok(())
    }

    fn router(self) -> Router<()> {
        let api = Router::new()
            .merge(routes::health::router(self.time.into(), self.health.into()))
            .merge(routes::contact::router(
                self.contact.into(),
                self.contact_rate_limit.into(),
            ))
            .fallback(routes::not_found)
            .layer(DefaultBodyLimit::max(self.config.body_limit))
            .apply(|router| {
                middlewares::rate_limit::add(
                    router,
                    self.global_rate_limit.into(),
                    GLOBAL_RATE_LIMITED,
                )
            });

        Router::new()
            .nest("/api", api)
            .fallback(routes::not_found)
            .apply(|router| middlewares::cors::add(router, &self.config.allowed_origins))
            .apply(middlewares::trace::add)
            .apply(middlewares::client_ip::add(self.config.real_ip_config))
            .apply(middlewares::panic_handler::add)
            .apply(middlewares::request_id::add)
            .apply(middlewares::security_headers::add)
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl+c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received SIGINT, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
