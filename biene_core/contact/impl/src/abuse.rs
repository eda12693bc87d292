use std::sync::LazyLock;

use biene_models::contact::ContactSubmission;
use regex::{RegexSet, RegexSetBuilder};

/// Markup and query fragments that have no business in a contact form.
///
/// This is a coarse heuristic on top of sanitization and template escaping,
/// not a replacement for either.
static SUSPICIOUS_PATTERNS: LazyLock<RegexSet> = LazyLock::new(|| {
    RegexSetBuilder::new([
        r"<script[^>]*>.*?</script>",
        r"javascript:",
        r"on\w+\s*=",
        r"(union|select|insert|update|delete|drop|create|alter)\s+(from|into|table|database)",
        r"eval\s*\(",
        r"expression\s*\(",
    ])
    .case_insensitive(true)
    .build()
    .unwrap()
});

/// Whether any of the text fields contains a script tag, an inline event
/// handler, a `javascript:` url or something that looks like sql.
pub fn is_suspicious(submission: &ContactSubmission) -> bool {
    let text = [
        submission.name.as_str(),
        submission.email.as_str(),
        submission.phone.as_deref().unwrap_or_default(),
        submission.message.as_str(),
    ]
    .join(" ");

    SUSPICIOUS_PATTERNS.is_match(&text)
}

#[cfg(test)]
mod tests {
    use biene_demo::contact::{ERIKA, MAX};

    use super::*;

    fn with_message(message: &str) -> ContactSubmission {
        ContactSubmission {
            message: message.into(),
            ..MAX.clone()
        }
    }

    #[test]
    fn benign() {
        assert!(!is_suspicious(&MAX));
        assert!(!is_suspicious(&ERIKA));

        for message in [
            "Können Sie uns ein Angebot für die Wartung unserer Brandmeldeanlage machen?",
            "Bitte wählen Sie aus, was für Sie am besten passt.",
            "Die Zeile 'select' im Formular war leer.",
            "Wir brauchen eine neue Steckdose im Büro, ein Termin am Montag wäre toll.",
        ] {
            assert!(!is_suspicious(&with_message(message)), "{message}");
        }
    }

    #[test]
    fn suspicious() {
        for message in [
            "<script>alert(1)</script>",
            "<SCRIPT type=\"text/javascript\">alert(1)</SCRIPT>",
            "Klicken Sie hier: JavaScript:alert(1)",
            "<img src=x onerror=alert(1)>",
            "<body onload = steal()>",
            "'; DROP TABLE users; --",
            "1; delete from contacts",
            "UNION\tSELECT password FROM users; insert into log",
            "eval (atob('...'))",
            "width: expression(alert(1))",
        ] {
            assert!(is_suspicious(&with_message(message)), "{message}");
        }
    }

    #[test]
    fn all_fields_are_checked() {
        let name = ContactSubmission {
            name: "onclick=x".into(),
            ..MAX.clone()
        };
        assert!(is_suspicious(&name));

        let phone = ContactSubmission {
            phone: Some("javascript:".into()),
            ..MAX.clone()
        };
        assert!(is_suspicious(&phone));
    }
}
