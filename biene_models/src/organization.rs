use serde::{Deserialize, Serialize};

/// Public contact details of the business, shown to people who reach out via
/// the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub name: String,
    /// Phone number as it is displayed, e.g. `02841 / 94 97 703`
    pub phone_display: String,
    /// Phone number as used in `tel:` links, e.g. `+4928419497703`
    pub phone_link: String,
    pub email: String,
    pub website: String,
}
