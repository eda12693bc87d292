use std::future::Future;

use biene_models::contact::{ContactSubmission, ValidationError};
use thiserror::Error;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait ContactFeatureService: Send + Sync + 'static {
    /// Check a submission of the public contact form and, if it is
    /// acceptable, notify the business and confirm receipt to the sender.
    fn submit(
        &self,
        submission: ContactSubmission,
    ) -> impl Future<Output = Result<ContactSubmitted, ContactSubmitError>> + Send;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactSubmitted {
    /// The notification has been accepted by the smtp server.
    Delivered,
    /// The honeypot was filled in. Nothing has been sent, but the client must
    /// not be able to tell.
    Discarded,
}

#[derive(Debug, Error)]
pub enum ContactSubmitError {
    #[error("The submission contains suspicious patterns.")]
    Suspicious,
    #[error("The submission is invalid.")]
    Invalid(Vec<ValidationError>),
    #[error("Failed to send notification.")]
    Send,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(feature = "mock")]
impl MockContactFeatureService {
    pub fn with_submit(
        mut self,
        submission: ContactSubmission,
        result: Result<ContactSubmitted, ContactSubmitError>,
    ) -> Self {
        self.expect_submit()
            .once()
            .with(mockall::predicate::eq(submission))
            .return_once(|_| Box::pin(std::future::ready(result)));
        self
    }
}
