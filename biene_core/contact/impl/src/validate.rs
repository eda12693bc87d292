use std::sync::LazyLock;

use biene_models::contact::{ContactField, ContactSubmission, ValidationError};
use lettre::Address;
use regex::Regex;

pub const NAME_MIN_LENGTH: usize = 2;
pub const NAME_MAX_LENGTH: usize = 100;
pub const EMAIL_MAX_LENGTH: usize = 255;
pub const PHONE_MAX_LENGTH: usize = 30;
pub const MESSAGE_MIN_LENGTH: usize = 10;
pub const MESSAGE_MAX_LENGTH: usize = 5000;

/// Local and international phone numbers with optional parentheses around the
/// first two groups, e.g. `+49 (2841) 9497703` or `02841-9497703`.
pub static PHONE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+]?[(]?[0-9]{1,4}[)]?[-\s.]?[(]?[0-9]{1,4}[)]?[-\s.]?[0-9]{1,9}$").unwrap()
});

const NAME_REQUIRED: ValidationError =
    ValidationError::new(ContactField::Name, "Name ist erforderlich");
const NAME_TOO_SHORT: ValidationError = ValidationError::new(
    ContactField::Name,
    "Name muss mindestens 2 Zeichen lang sein",
);
const NAME_TOO_LONG: ValidationError = ValidationError::new(
    ContactField::Name,
    "Name darf maximal 100 Zeichen lang sein",
);
const EMAIL_REQUIRED: ValidationError =
    ValidationError::new(ContactField::Email, "E-Mail-Adresse ist erforderlich");
const EMAIL_INVALID: ValidationError = ValidationError::new(
    ContactField::Email,
    "Bitte geben Sie eine gültige E-Mail-Adresse ein",
);
const EMAIL_TOO_LONG: ValidationError =
    ValidationError::new(ContactField::Email, "E-Mail-Adresse ist zu lang");
const PHONE_INVALID: ValidationError = ValidationError::new(
    ContactField::Phone,
    "Bitte geben Sie eine gültige Telefonnummer ein",
);
const PHONE_TOO_LONG: ValidationError =
    ValidationError::new(ContactField::Phone, "Telefonnummer ist zu lang");
const MESSAGE_REQUIRED: ValidationError =
    ValidationError::new(ContactField::Message, "Nachricht ist erforderlich");
const MESSAGE_TOO_SHORT: ValidationError = ValidationError::new(
    ContactField::Message,
    "Die Nachricht muss mindestens 10 Zeichen lang sein",
);
const MESSAGE_TOO_LONG: ValidationError = ValidationError::new(
    ContactField::Message,
    "Die Nachricht darf maximal 5000 Zeichen lang sein",
);
const HONEYPOT_FILLED: ValidationError =
    ValidationError::new(ContactField::Honeypot, "Spam-Schutz wurde ausgelöst");

/// Check every field of the submission against the contact form rules.
///
/// Errors are reported in field order. An empty list means the submission is
/// acceptable.
pub fn validate(submission: &ContactSubmission) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    let name = submission.name.trim();
    match name.chars().count() {
        0 => errors.push(NAME_REQUIRED),
        n if n < NAME_MIN_LENGTH => errors.push(NAME_TOO_SHORT),
        n if n > NAME_MAX_LENGTH => errors.push(NAME_TOO_LONG),
        _ => {}
    }

    let email = submission.email.trim();
    if email.is_empty() {
        errors.push(EMAIL_REQUIRED);
    } else if !is_valid_email(email) {
        errors.push(EMAIL_INVALID);
    } else if email.chars().count() > EMAIL_MAX_LENGTH {
        errors.push(EMAIL_TOO_LONG);
    }

    if let Some(phone) = submission.phone() {
        if !PHONE_REGEX.is_match(phone) {
            errors.push(PHONE_INVALID);
        } else if phone.chars().count() > PHONE_MAX_LENGTH {
            errors.push(PHONE_TOO_LONG);
        }
    }

    let message = submission.message.trim();
    match message.chars().count() {
        0 => errors.push(MESSAGE_REQUIRED),
        n if n < MESSAGE_MIN_LENGTH => errors.push(MESSAGE_TOO_SHORT),
        n if n > MESSAGE_MAX_LENGTH => errors.push(MESSAGE_TOO_LONG),
        _ => {}
    }

    if submission.is_honeypot_filled() {
        errors.push(HONEYPOT_FILLED);
    }

    errors
}

/// An address we can deliver to: syntactically valid and with a fully
/// qualified domain ending in an alphabetic top level domain.
fn is_valid_email(email: &str) -> bool {
    let Ok(address) = email.parse::<Address>() else {
        return false;
    };

    address
        .domain()
        .rsplit_once('.')
        .is_some_and(|(host, tld)| {
            !host.is_empty() && tld.chars().count() >= 2 && tld.chars().all(char::is_alphabetic)
        })
}
