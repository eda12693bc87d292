use std::time::Duration;

use anyhow::anyhow;
use biene_email_contracts::{Email, EmailBody, EmailService};
use biene_models::email_address::EmailAddressWithName;
use biene_utils::{trace_instrument, Apply};
use lettre::{
    message::{header::ContentType, MessageBuilder, MultiPart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{debug, warn};

pub mod template;

/// Sends emails via smtp.
///
/// The transport does not pool connections, every email is delivered over a
/// fresh connection.
#[derive(Debug, Clone)]
pub struct EmailServiceImpl {
    from: EmailAddressWithName,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

#[derive(Debug, Clone)]
pub struct EmailServiceConfig {
    pub host: String,
    pub port: u16,
    /// Use implicit tls. Otherwise the connection is upgraded via STARTTLS if
    /// the server supports it.
    pub secure: bool,
    pub credentials: Option<SmtpCredentials>,
    /// Applies to connecting, the greeting and every subsequent read or write.
    pub timeout: Duration,
    pub from: EmailAddressWithName,
}

#[derive(Clone)]
pub struct SmtpCredentials {
    pub user: String,
    pub password: String,
}

impl std::fmt::Debug for SmtpCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmtpCredentials")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

impl EmailServiceImpl {
    pub fn new(config: EmailServiceConfig) -> anyhow::Result<Self> {
        let tls_parameters = TlsParameters::new(config.host.clone())?;
        let tls = if config.secure {
            Tls::Wrapper(tls_parameters)
        } else {
            Tls::Opportunistic(tls_parameters)
        };

        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .tls(tls)
            .timeout(Some(config.timeout))
            .apply_map(config.credentials, |builder, credentials| {
                builder.credentials(Credentials::new(credentials.user, credentials.password))
            })
            .build();

        Ok(Self {
            from: config.from,
            transport,
        })
    }
}

impl EmailService for EmailServiceImpl {
    #[trace_instrument(skip(self, email), fields(recipient = %email.recipient, subject = %email.subject))]
    async fn send(&self, email: Email) -> anyhow::Result<bool> {
        let message = build_message(&self.from, email)?;

        let response = self.transport.send(message).await?;
        if !response.is_positive() {
            warn!(code = %response.code(), "smtp server rejected email");
            return Ok(false);
        }

        debug!(code = %response.code(), "email accepted by smtp server");
        Ok(true)
    }

    #[trace_instrument(skip(self))]
    async fn ping(&self) -> anyhow::Result<()> {
        self.transport
            .test_connection()
            .await?
            .then_some(())
            .ok_or_else(|| anyhow!("Failed to ping smtp server"))
    }
}

fn build_message(from: &EmailAddressWithName, email: Email) -> anyhow::Result<Message> {
    let builder = Message::builder()
        .from(from.0.clone())
        .to(email.recipient.0)
        .apply_map(email.reply_to.map(|x| x.0), MessageBuilder::reply_to)
        .subject(email.subject);

    let message = match email.body {
        EmailBody::Text(body) => builder.header(ContentType::TEXT_PLAIN).body(body)?,
        EmailBody::Html(body) => builder.header(ContentType::TEXT_HTML).body(body)?,
        EmailBody::Alternative { html, text } => {
            builder.multipart(MultiPart::alternative_plain_html(text, html))?
        }
    };

    Ok(message)
}
