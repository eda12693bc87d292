use std::{
    fmt,
    net::IpAddr,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, Context};
use biene_models::{
    email_address::{EmailAddress, EmailAddressWithName},
    organization::Organization,
};
use config::{builder::DefaultState, ConfigBuilder, File, FileFormat};
use serde::Deserialize;

pub use duration::Duration;

mod duration;

/// Colon separated list of additional config files
pub const CONFIG_PATHS_ENV: &str = "BIENE_CONFIG";

const DEFAULT_CONFIG: &str = include_str!("../../config.toml");

/// Load the embedded default config, then the files listed in `BIENE_CONFIG`,
/// then the environment overrides.
pub fn load() -> anyhow::Result<Config> {
    load_from(&config_paths(), |key| std::env::var(key).ok())
}

/// Paths of the config files listed in `BIENE_CONFIG`
pub fn config_paths() -> Vec<PathBuf> {
    std::env::var_os(CONFIG_PATHS_ENV)
        .map(|paths| std::env::split_paths(&paths).collect())
        .unwrap_or_default()
}

pub fn load_from(
    paths: &[impl AsRef<Path>],
    env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<Config> {
    let builder = config::Config::builder()
        .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

    let builder = paths.iter().try_fold(builder, |builder, path| {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {}", path.display()))?;
        let source = File::from_str(&content, FileFormat::Toml);
        anyhow::Ok(builder.add_source(source))
    })?;

    let config: Config = apply_env_overrides(builder, env)?
    .build()?
    .try_deserialize()
    .context("Failed to load config")?;

    config.email.sender()?;
    config.email.recipient()?;

    Ok(config)
}

fn apply_env_overrides(
    mut builder: ConfigBuilder<DefaultState>,
    raw_env: impl Fn(&str) -> Option<String>,
) -> anyhow::Result<ConfigBuilder<DefaultState>> {
    let env = |var: &str| raw_env(var).filter(|value| !value.trim().is_empty());

    // passwords are taken verbatim, surrounding whitespace included
    if let Some(password) = raw_env("SMTP_PASS").filter(|value| !value.is_empty()) {
        builder = builder.set_override("email.password", password)?;
    }

    for (var, key) in [
        ("SMTP_HOST", "email.host"),
        ("SMTP_USER", "email.user"),
        ("SMTP_FROM", "email.from"),
        ("SMTP_FROM_NAME", "email.from_name"),
        ("SMTP_TO", "email.to"),
    ] {
        if let Some(value) = env(var) {
            builder = builder.set_override(key, value.trim())?;
        }
    }

    for (var, key) in [("PORT", "http.port"), ("SMTP_PORT", "email.port")] {
        if let Some(value) = env(var) {
            let port = parse_env::<u16>(var, &value)?;
            builder = builder.set_override(key, i64::from(port))?;
        }
    }

    if let Some(value) = env("SMTP_SECURE") {
        builder = builder.set_override("email.secure", value.trim() == "true")?;
    }

    if let Some(value) = env("ALLOWED_ORIGINS") {
        builder = builder.set_override("http.allowed_origins", split_list(&value))?;
    }

    if let Some(value) = env("RATE_LIMIT_WINDOW_MINUTES") {
        let minutes = parse_env::<u32>("RATE_LIMIT_WINDOW_MINUTES", &value)?;
        builder = builder.set_override("rate_limit.contact.window", format!("{minutes}m"))?;
    }

    if let Some(value) = env("RATE_LIMIT_MAX") {
        let max = parse_env::<u32>("RATE_LIMIT_MAX", &value)?;
        builder = builder.set_override("rate_limit.contact.max", i64::from(max))?;
    }

    if let Some(value) = env("RATE_LIMIT_WHITELIST") {
        builder = builder.set_override("rate_limit.whitelist", split_list(&value))?;
    }

    Ok(builder)
}

fn parse_env<T>(var: &str, value: &str) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("Invalid value for {var}: {value:?}"))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(Into::into)
        .collect()
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub email: EmailConfig,
    pub rate_limit: RateLimitConfig,
    pub health: HealthConfig,
    pub organization: Organization,
}

#[derive(Debug, Deserialize)]
pub struct HttpConfig {
    pub host: IpAddr,
    pub port: u16,
    pub allowed_origins: Vec<String>,
    pub body_limit: usize,
    pub real_ip: Option<HttpRealIpConfig>,
}

#[derive(Debug, Deserialize)]
pub struct HttpRealIpConfig {
    pub header: String,
    pub set_from: IpAddr,
}

#[derive(Deserialize)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub secure: bool,
    pub user: String,
    pub password: String,
    pub from: Option<EmailAddress>,
    pub from_name: String,
    pub to: Option<EmailAddress>,
    pub timeout: Duration,
}

impl EmailConfig {
    /// The `From` of every email, `from` or else `user`.
    pub fn sender(&self) -> anyhow::Result<EmailAddressWithName> {
        Ok(self
            .address(self.from.as_ref(), "from")?
            .with_name(self.from_name.clone()))
    }

    /// Where contact notifications are sent to, `to` or else `user`.
    pub fn recipient(&self) -> anyhow::Result<EmailAddressWithName> {
        self.address(self.to.as_ref(), "to").map(Into::into)
    }

    fn address(&self, address: Option<&EmailAddress>, field: &str) -> anyhow::Result<EmailAddress> {
        if let Some(address) = address {
            return Ok(address.clone());
        }

        if self.user.is_empty() {
            return Err(anyhow!("Neither email.{field} nor email.user is set"));
        }

        self.user
            .parse()
            .with_context(|| format!("email.{field} is not set and email.user is not an email address"))
    }
}

impl fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmailConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("user", &self.user)
            .field("from", &self.from)
            .field("from_name", &self.from_name)
            .field("to", &self.to)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
pub struct RateLimitConfig {
    pub whitelist: Vec<IpAddr>,
    pub contact: RateLimitWindowConfig,
    pub global: RateLimitWindowConfig,
}

#[derive(Debug, Deserialize)]
pub struct RateLimitWindowConfig {
    pub window: Duration,
    pub max: u64,
}

#[derive(Debug, Deserialize)]
pub struct HealthConfig {
    pub cache_ttl: Duration,
}

#[cfg(test)]
mod tests;
