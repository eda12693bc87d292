use std::sync::LazyLock;

use biene_models::contact::ContactSubmission;
use regex::Regex;

static TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new("<[^>]*>").unwrap());

const GMAIL_DOMAINS: &[&str] = &["gmail.com", "googlemail.com"];
const OUTLOOK_DOMAINS: &[&str] = &[
    "hotmail.at",
    "hotmail.be",
    "hotmail.ca",
    "hotmail.cl",
    "hotmail.co.il",
    "hotmail.co.jp",
    "hotmail.co.nz",
    "hotmail.co.th",
    "hotmail.co.uk",
    "hotmail.com",
    "hotmail.com.ar",
    "hotmail.com.au",
    "hotmail.com.br",
    "hotmail.com.gr",
    "hotmail.com.mx",
    "hotmail.com.pe",
    "hotmail.com.tr",
    "hotmail.com.vn",
    "hotmail.cz",
    "hotmail.de",
    "hotmail.dk",
    "hotmail.es",
    "hotmail.fr",
    "hotmail.hu",
    "hotmail.id",
    "hotmail.ie",
    "hotmail.in",
    "hotmail.it",
    "hotmail.jp",
    "hotmail.kr",
    "hotmail.lv",
    "hotmail.my",
    "hotmail.ph",
    "hotmail.pt",
    "hotmail.sa",
    "hotmail.sg",
    "hotmail.sk",
    "live.be",
    "live.co.uk",
    "live.com",
    "live.com.ar",
    "live.com.mx",
    "live.de",
    "live.es",
    "live.eu",
    "live.fr",
    "live.it",
    "live.nl",
    "msn.com",
    "outlook.at",
    "outlook.be",
    "outlook.cl",
    "outlook.co.il",
    "outlook.co.nz",
    "outlook.co.th",
    "outlook.com",
    "outlook.com.ar",
    "outlook.com.au",
    "outlook.com.br",
    "outlook.com.gr",
    "outlook.com.pe",
    "outlook.com.tr",
    "outlook.com.vn",
    "outlook.cz",
    "outlook.de",
    "outlook.dk",
    "outlook.es",
    "outlook.fr",
    "outlook.hu",
    "outlook.id",
    "outlook.ie",
    "outlook.in",
    "outlook.it",
    "outlook.jp",
    "outlook.kr",
    "outlook.lv",
    "outlook.my",
    "outlook.ph",
    "outlook.pt",
    "outlook.sa",
    "outlook.sg",
    "outlook.sk",
    "passport.com",
    "windowslive.com",
];
const YAHOO_DOMAINS: &[&str] = &[
    "rocketmail.com",
    "yahoo.ca",
    "yahoo.co.uk",
    "yahoo.com",
    "yahoo.de",
    "yahoo.es",
    "yahoo.fr",
    "yahoo.in",
    "yahoo.it",
    "ymail.com",
];
const YANDEX_DOMAINS: &[&str] = &[
    "ya.ru",
    "yandex.by",
    "yandex.com",
    "yandex.kz",
    "yandex.ru",
    "yandex.ua",
];
const ICLOUD_DOMAINS: &[&str] = &["icloud.com", "me.com", "mac.com"];

/// Strip markup from every field and normalize the email address.
///
/// Applying this function to its own output does not change it any further.
/// The honeypot is left untouched, it is only ever inspected.
pub fn sanitize(submission: ContactSubmission) -> ContactSubmission {
    ContactSubmission {
        name: sanitize_text(&submission.name),
        email: sanitize_email(&submission.email),
        phone: submission
            .phone
            .as_deref()
            .map(sanitize_text)
            .filter(|phone| !phone.is_empty()),
        message: sanitize_text(&submission.message),
        honeypot: submission.honeypot,
    }
}

/// Remove html tags and any stray angle brackets, then trim.
pub fn sanitize_text(input: &str) -> String {
    TAG_REGEX
        .replace_all(input, "")
        .replace(['<', '>'], "")
        .trim()
        .into()
}

/// Lowercase the address and remove provider specific aliases, so that
/// `Max.Mustermann+Kontakt@GoogleMail.com` becomes
/// `max.mustermann@gmail.com`.
///
/// Dots in the local part are kept. Addresses that cannot be split into a
/// local part and a domain are only lowercased.
pub fn sanitize_email(input: &str) -> String {
    let email = sanitize_text(input).to_lowercase();

    let Some((local, domain)) = email.split_once('@') else {
        return email;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return email;
    }

    let (local, domain) = if GMAIL_DOMAINS.contains(&domain) {
        (strip_subaddress(local, '+'), "gmail.com")
    } else if OUTLOOK_DOMAINS.contains(&domain) || ICLOUD_DOMAINS.contains(&domain) {
        (strip_subaddress(local, '+'), domain)
    } else if YAHOO_DOMAINS.contains(&domain) {
        (strip_subaddress(local, '-'), domain)
    } else if YANDEX_DOMAINS.contains(&domain) {
        (local, "yandex.ru")
    } else {
        (local, domain)
    };

    if local.is_empty() {
        return email;
    }

    format!("{local}@{domain}")
}

fn strip_subaddress(local: &str, separator: char) -> &str {
    local
        .split_once(separator)
        .map_or(local, |(local, _)| local)
}
