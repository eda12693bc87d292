use std::{collections::HashMap, net::Ipv4Addr, time::Duration};

use pretty_assertions::assert_eq;

use super::*;

const NO_PATHS: &[&Path] = &[];

fn env<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
    let vars = vars.iter().copied().collect::<HashMap<_, _>>();
    move |key| vars.get(key).map(|value| value.to_string())
}

#[test]
fn load_default_config() {
    // Act
    let config = load_from(NO_PATHS, env(&[("SMTP_USER", "kontakt@biene-dienstleistung.de")])).unwrap();

    // Assert
    assert_eq!(config.http.port, 3001);
    assert_eq!(config.http.allowed_origins, ["http://localhost:3000"]);
    assert_eq!(config.http.body_limit, 10 * 1024);
    assert!(config.http.real_ip.is_none());
    assert_eq!(config.email.host, "smtp.hostinger.com");
    assert_eq!(config.email.port, 587);
    assert!(!config.email.secure);
    assert_eq!(*config.email.timeout, Duration::from_secs(10));
    assert_eq!(*config.rate_limit.contact.window, Duration::from_secs(60));
    assert_eq!(config.rate_limit.contact.max, 5);
    assert_eq!(*config.rate_limit.global.window, Duration::from_secs(15 * 60));
    assert_eq!(config.rate_limit.global.max, 100);
    assert!(config.rate_limit.whitelist.is_empty());
    assert_eq!(config.organization.name, "Biene Dienstleistung");

    let sender = config.email.sender().unwrap();
    assert_eq!(sender.name(), Some("Biene Dienstleistung"));
    assert_eq!(
        sender.into_email_address().as_str(),
        "kontakt@biene-dienstleistung.de"
    );
    let recipient = config.email.recipient().unwrap();
    assert_eq!(recipient.name(), None);
    assert_eq!(
        recipient.into_email_address().as_str(),
        "kontakt@biene-dienstleistung.de"
    );
}

#[test]
fn missing_smtp_user() {
    // Act
    let result = load_from(NO_PATHS, env(&[]));

    // Assert
    assert!(result.is_err());
}

#[test]
fn env_overrides() {
    // Arrange
    let vars = [
        ("PORT", "8080"),
        ("SMTP_HOST", "mail.example.de"),
        ("SMTP_PORT", "465"),
        ("SMTP_SECURE", "true"),
        ("SMTP_USER", "user@example.de"),
        ("SMTP_PASS", "hunter2"),
        ("SMTP_FROM", "noreply@example.de"),
        ("SMTP_FROM_NAME", "Biene"),
        ("SMTP_TO", "inbox@example.de"),
        (
            "ALLOWED_ORIGINS",
            "https://biene-dienstleistung.de, https://www.biene-dienstleistung.de,",
        ),
        ("RATE_LIMIT_WINDOW_MINUTES", "5"),
        ("RATE_LIMIT_MAX", "3"),
        ("RATE_LIMIT_WHITELIST", "127.0.0.1,::1"),
    ];

    // Act
    let config = load_from(NO_PATHS, env(&vars)).unwrap();

    // Assert
    assert_eq!(config.http.port, 8080);
    assert_eq!(
        config.http.allowed_origins,
        [
            "https://biene-dienstleistung.de",
            "https://www.biene-dienstleistung.de"
        ]
    );
    assert_eq!(config.email.host, "mail.example.de");
    assert_eq!(config.email.port, 465);
    assert!(config.email.secure);
    assert_eq!(config.email.password, "hunter2");
    let sender = config.email.sender().unwrap();
    assert_eq!(sender.name(), Some("Biene"));
    assert_eq!(sender.into_email_address().as_str(), "noreply@example.de");
    assert_eq!(
        config.email.recipient().unwrap().into_email_address().as_str(),
        "inbox@example.de"
    );
    assert_eq!(*config.rate_limit.contact.window, Duration::from_secs(5 * 60));
    assert_eq!(config.rate_limit.contact.max, 3);
    assert_eq!(
        config.rate_limit.whitelist,
        [
            IpAddr::V4(Ipv4Addr::LOCALHOST),
            "::1".parse::<IpAddr>().unwrap()
        ]
    );
}

#[test]
fn empty_env_values_are_ignored() {
    // Act
    let config = load_from(
        NO_PATHS,
        env(&[
            ("SMTP_USER", "kontakt@biene-dienstleistung.de"),
            ("SMTP_FROM", ""),
            ("PORT", " "),
        ]),
    )
    .unwrap();

    // Assert
    assert_eq!(config.http.port, 3001);
    assert_eq!(config.email.from, None);
}

#[test]
fn password_is_taken_verbatim() {
    // Arrange
    let vars = [
        ("SMTP_USER", "kontakt@biene-dienstleistung.de"),
        ("SMTP_PASS", " secret "),
    ];

    // Act
    let config = load_from(NO_PATHS, env(&vars)).unwrap();

    // Assert
    assert_eq!(config.email.password, " secret ");
}

#[test]
fn invalid_env_value() {
    // Act
    let result = load_from(
        NO_PATHS,
        env(&[
            ("SMTP_USER", "kontakt@biene-dienstleistung.de"),
            ("PORT", "http"),
        ]),
    );

    // Assert
    let err = result.unwrap_err();
    assert!(format!("{err:#}").contains("PORT"));
}

#[test]
fn password_is_not_printed() {
    // Act
    let config = load_from(
        NO_PATHS,
        env(&[
            ("SMTP_USER", "kontakt@biene-dienstleistung.de"),
            ("SMTP_PASS", "hunter2"),
        ]),
    )
    .unwrap();

    // Assert
    assert!(!format!("{config:?}").contains("hunter2"));
}

#[test]
fn config_files_are_layered() {
    // Arrange
    let path = std::env::temp_dir().join(format!("biene-config-test-{}.toml", std::process::id()));
    std::fs::write(
        &path,
        r#"
[http]
port = 4000
real_ip = { header = "X-Real-Ip", set_from = "127.0.0.1" }

[email]
user = "kontakt@biene-dienstleistung.de"
"#,
    )
    .unwrap();

    // Act
    let result = load_from(&[&path], env(&[("PORT", "5000")]));
    std::fs::remove_file(&path).unwrap();

    // Assert
    let config = result.unwrap();
    assert_eq!(config.http.port, 5000);
    assert_eq!(config.http.host, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
    let real_ip = config.http.real_ip.unwrap();
    assert_eq!(real_ip.header, "X-Real-Ip");
    assert_eq!(real_ip.set_from, IpAddr::V4(Ipv4Addr::LOCALHOST));
}

#[test]
fn missing_config_file() {
    // Act
    let result = load_from(&[Path::new("/nonexistent/biene.toml")], env(&[]));

    // Assert
    assert!(result.is_err());
}
