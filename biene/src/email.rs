use anyhow::Context;
use biene_config::EmailConfig;
use biene_email_impl::{EmailServiceConfig, EmailServiceImpl, SmtpCredentials};

/// Configure the SMTP transport. No connection is made until the first email
/// is sent or the server is pinged.
pub fn connect(config: &EmailConfig) -> anyhow::Result<EmailServiceImpl> {
    let credentials = (!config.user.is_empty()).then(|| SmtpCredentials {
        user: config.user.clone(),
        password: config.password.clone(),
    });

    EmailServiceImpl::new(EmailServiceConfig {
        host: config.host.clone(),
        port: config.port,
        secure: config.secure,
        credentials,
        timeout: config.timeout.into(),
        from: config.sender()?,
    })
    .context("Failed to configure SMTP transport")
}
