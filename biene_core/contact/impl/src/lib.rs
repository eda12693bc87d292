use std::{fmt::Display, time::Instant};

use anyhow::Context;
use biene_core_contact_contracts::{ContactFeatureService, ContactSubmitError, ContactSubmitted};
use biene_email_contracts::template::TemplateEmailService;
use biene_models::{
    contact::ContactSubmission,
    email_address::{EmailAddress, EmailAddressWithName},
    organization::Organization,
};
use biene_shared_contracts::time::TimeService;
use biene_templates_contracts::{ContactConfirmationTemplate, ContactNotificationTemplate};
use biene_utils::trace_instrument;
use chrono::{DateTime, Local, TimeZone};
use tracing::{error, info, warn};

use crate::pipeline::{ContactPipeline, ContactRejection};

pub mod abuse;
pub mod pipeline;
pub mod sanitize;
pub mod validate;

#[cfg(test)]
mod tests;

#[derive(Debug, Clone)]
#[cfg_attr(test, derive(Default))]
pub struct ContactFeatureServiceImpl<Time, TemplateEmail> {
    time: Time,
    template_email: TemplateEmail,
    config: ContactFeatureConfig,
}

#[derive(Debug, Clone)]
pub struct ContactFeatureConfig {
    /// Receives a notification for every accepted submission
    pub recipient: EmailAddressWithName,
    pub organization: Organization,
}

impl<Time, TemplateEmail> ContactFeatureServiceImpl<Time, TemplateEmail> {
    pub fn new(time: Time, template_email: TemplateEmail, config: ContactFeatureConfig) -> Self {
        Self {
            time,
            template_email,
            config,
        }
    }
}

impl<Time, TemplateEmail> ContactFeatureService for ContactFeatureServiceImpl<Time, TemplateEmail>
where
    Time: TimeService,
    TemplateEmail: TemplateEmailService,
{
    #[trace_instrument(skip(self, submission))]
    async fn submit(
        &self,
        submission: ContactSubmission,
    ) -> Result<ContactSubmitted, ContactSubmitError> {
        let start = Instant::now();

        let submission = match ContactPipeline.run(submission) {
            Ok(submission) => submission,
            Err(ContactRejection::Honeypot) => {
                warn!("honeypot field filled in, discarding submission");
                return Ok(ContactSubmitted::Discarded);
            }
            Err(ContactRejection::Suspicious) => {
                warn!("suspicious patterns in submission");
                return Err(ContactSubmitError::Suspicious);
            }
            Err(ContactRejection::Invalid(errors)) => {
                warn!(?errors, "invalid submission");
                return Err(ContactSubmitError::Invalid(errors));
            }
        };

        let sender: EmailAddressWithName = submission
            .email
            .parse::<EmailAddress>()
            .context("Failed to parse validated email address")?
            .into();

        self.send_notification(&submission, sender.clone()).await?;
        self.send_confirmation(&submission, sender).await;

        info!(
            duration_ms = start.elapsed().as_millis(),
            "contact submission processed"
        );

        Ok(ContactSubmitted::Delivered)
    }
}

impl<Time, TemplateEmail> ContactFeatureServiceImpl<Time, TemplateEmail>
where
    Time: TimeService,
    TemplateEmail: TemplateEmailService,
{
    async fn send_notification(
        &self,
        submission: &ContactSubmission,
        sender: EmailAddressWithName,
    ) -> Result<(), ContactSubmitError> {
        let data = ContactNotificationTemplate {
            name: submission.name.clone(),
            email: submission.email.clone(),
            phone: submission.phone().map(Into::into),
            message: submission.message.clone(),
            received_at: format_timestamp(self.time.now().with_timezone(&Local)),
            organization: self.config.organization.clone(),
        };

        let sent = self
            .template_email
            .send_contact_notification(self.config.recipient.clone(), sender, &data)
            .await
            .context("Failed to send contact notification")?;
        if !sent {
            error!("smtp server rejected contact notification");
            return Err(ContactSubmitError::Send);
        }

        Ok(())
    }

    /// Failures are logged but otherwise ignored, the notification has already
    /// reached the business at this point.
    async fn send_confirmation(&self, submission: &ContactSubmission, sender: EmailAddressWithName) {
        let data = ContactConfirmationTemplate {
            name: submission.name.clone(),
            organization: self.config.organization.clone(),
        };

        match self
            .template_email
            .send_contact_confirmation(sender, &data)
            .await
        {
            Ok(true) => {}
            Ok(false) => warn!("smtp server rejected contact confirmation"),
            Err(err) => error!("Failed to send contact confirmation: {err:?}"),
        }
    }
}

/// `01.06.2024, 14:05`
fn format_timestamp<Tz>(time: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.format("%d.%m.%Y, %H:%M").to_string()
}

#[cfg(test)]
impl Default for ContactFeatureConfig {
    fn default() -> Self {
        Self {
            recipient: biene_demo::contact::OPERATOR.clone(),
            organization: biene_demo::contact::ORGANIZATION.clone(),
        }
    }
}
