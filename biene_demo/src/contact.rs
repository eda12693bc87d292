use std::sync::LazyLock;

use biene_models::{
    contact::ContactSubmission, email_address::EmailAddressWithName, organization::Organization,
};

pub static ORGANIZATION: LazyLock<Organization> = LazyLock::new(|| Organization {
    name: "Biene Dienstleistung".into(),
    phone_display: "02841 / 94 97 703".into(),
    phone_link: "+4928419497703".into(),
    email: "info@biene-dienstleistung.de".into(),
    website: "biene-dienstleistung.de".into(),
});

pub static OPERATOR: LazyLock<EmailAddressWithName> =
    LazyLock::new(|| "kontakt@biene-dienstleistung.de".parse().unwrap());

/// A valid submission without a phone number.
pub static MAX: LazyLock<ContactSubmission> = LazyLock::new(|| ContactSubmission {
    name: "Max Mustermann".into(),
    email: "max@example.de".into(),
    phone: None,
    message: "Bitte um Rückruf bezüglich Elektroinstallation.".into(),
    honeypot: None,
});

/// A valid submission with a phone number and untidy whitespace.
pub static ERIKA: LazyLock<ContactSubmission> = LazyLock::new(|| ContactSubmission {
    name: "  Erika Musterfrau ".into(),
    email: " Erika.Musterfrau@Example.COM ".into(),
    phone: Some("+49 (2841) 9497703".into()),
    message: "Wir planen eine Alarmanlage für unser Ladenlokal.\nWann hätten Sie Zeit?".into(),
    honeypot: Some(String::new()),
});

/// A submission where the hidden honeypot field was filled in.
pub static BOT: LazyLock<ContactSubmission> = LazyLock::new(|| ContactSubmission {
    name: "Cheap Pills".into(),
    email: "bot@spam.example".into(),
    phone: None,
    message: "Buy cheap pills now at our online shop!".into(),
    honeypot: Some("https://spam.example/".into()),
});
