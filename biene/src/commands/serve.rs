use biene_config::Config;
use biene_email_contracts::EmailService;
use tracing::{info, warn};

use crate::{email, environment};

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!(
        host = %config.email.host,
        port = config.email.port,
        "Connecting to smtp server"
    );
    let email = email::connect(&config.email)?;
    match email.ping().await {
        Ok(()) => info!("SMTP server is ready"),
        Err(err) => warn!("SMTP server is not reachable, contact requests will fail: {err:#}"),
    }

    let config_provider = environment::ConfigProvider::new(&config)?;
    let server = environment::provide_rest_server(config_provider, email)?;

    info!(
        allowed_origins = ?config.http.allowed_origins,
        "Starting http server on {}:{}",
        config.http.host,
        config.http.port
    );
    server.serve(config.http.host, config.http.port).await
}
