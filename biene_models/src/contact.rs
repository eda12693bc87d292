use std::fmt;

use serde::Serialize;

/// A message submitted through the public contact form.
///
/// Built from the untrusted request body of a single request and never
/// persisted. After sanitization `name`, `phone` and `message` contain no
/// angle brackets and `email` is lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub message: String,
    /// Value of the hidden form field. Humans never fill it in.
    pub honeypot: Option<String>,
}

impl ContactSubmission {
    /// Whether the hidden honeypot field contains anything but whitespace.
    pub fn is_honeypot_filled(&self) -> bool {
        self.honeypot
            .as_deref()
            .is_some_and(|honeypot| !honeypot.trim().is_empty())
    }

    /// The phone number, if one was provided and is not blank.
    pub fn phone(&self) -> Option<&str> {
        self.phone
            .as_deref()
            .map(str::trim)
            .filter(|phone| !phone.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContactField {
    Name,
    Email,
    Phone,
    Message,
    Honeypot,
}

impl ContactField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Message => "message",
            Self::Honeypot => "honeypot",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single violated rule of a [`ContactSubmission`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: ContactField,
    pub message: &'static str,
}

impl ValidationError {
    pub const fn new(field: ContactField, message: &'static str) -> Self {
        Self { field, message }
    }
}
