use biene_models::contact::{ContactSubmission, ValidationError};

use crate::{abuse::is_suspicious, sanitize::sanitize, validate::validate};

/// The pure stages every submission passes before anything is sent.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContactPipeline;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactRejection {
    Honeypot,
    Suspicious,
    Invalid(Vec<ValidationError>),
}

impl ContactPipeline {
    /// Run honeypot check, sanitization, abuse detection and validation in
    /// this order and return the sanitized submission if all of them pass.
    pub fn run(self, submission: ContactSubmission) -> Result<ContactSubmission, ContactRejection> {
        if submission.is_honeypot_filled() {
            return Err(ContactRejection::Honeypot);
        }

        let submission = sanitize(submission);

        if is_suspicious(&submission) {
            return Err(ContactRejection::Suspicious);
        }

        let errors = validate(&submission);
        if !errors.is_empty() {
            return Err(ContactRejection::Invalid(errors));
        }

        Ok(submission)
    }
}
