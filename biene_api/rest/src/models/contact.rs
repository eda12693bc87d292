use biene_models::contact::ContactSubmission;
use serde::Deserialize;

/// Body of a contact form submission.
///
/// Missing fields are treated as empty so that they are reported by the
/// validation instead of being rejected as a malformed request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ApiContactSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub message: Option<String>,
    /// Honeypot, hidden from humans
    pub website: Option<String>,
    /// Alternative name of the honeypot
    pub company_url: Option<String>,
}

impl From<ApiContactSubmission> for ContactSubmission {
    fn from(value: ApiContactSubmission) -> Self {
        let honeypot = [value.website, value.company_url]
            .into_iter()
            .flatten()
            .find(|honeypot| !honeypot.is_empty());

        Self {
            name: value.name.unwrap_or_default(),
            email: value.email.unwrap_or_default(),
            phone: value.phone,
            message: value.message.unwrap_or_default(),
            honeypot,
        }
    }
}
