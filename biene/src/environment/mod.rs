use std::{net::IpAddr, sync::Arc};

use biene_api_rest::{RealIpConfig, RestServerConfig};
use biene_config::{Config, RateLimitWindowConfig};
use biene_core_contact_impl::ContactFeatureConfig;
use biene_core_health_impl::HealthFeatureConfig;
use biene_shared_impl::rate_limit::RateLimitConfig;
use types::{
    ContactFeature, Email, HealthFeature, RateLimit, RestServer, Template, TemplateEmail, Time,
};

pub mod types;

/// Everything the services need from the configuration
#[derive(Debug, Clone)]
pub struct ConfigProvider {
    // API
    pub rest_server_config: RestServerConfig,

    // Shared
    pub contact_rate_limit_config: RateLimitConfig,
    pub global_rate_limit_config: RateLimitConfig,

    // Core
    pub contact_feature_config: ContactFeatureConfig,
    pub health_feature_config: HealthFeatureConfig,
}

impl ConfigProvider {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        // API
        let rest_server_config = RestServerConfig {
            allowed_origins: config.http.allowed_origins.clone(),
            body_limit: config.http.body_limit,
            real_ip_config: config.http.real_ip.as_ref().map(|real_ip_config| {
                Arc::new(RealIpConfig {
                    header: real_ip_config.header.clone(),
                    set_from: real_ip_config.set_from,
                })
            }),
        };

        // Shared
        let rate_limit_config =
            |window_config: &RateLimitWindowConfig, whitelist: &[IpAddr]| RateLimitConfig {
                window: window_config.window.into(),
                max: window_config.max,
                whitelist: whitelist.into(),
            };
        let contact_rate_limit_config =
            rate_limit_config(&config.rate_limit.contact, &config.rate_limit.whitelist);
        let global_rate_limit_config = rate_limit_config(&config.rate_limit.global, &[]);

        // Core
        let contact_feature_config = ContactFeatureConfig {
            recipient: config.email.recipient()?,
            organization: config.organization.clone(),
        };

        let health_feature_config = HealthFeatureConfig {
            cache_ttl: config.health.cache_ttl.into(),
        };

        Ok(Self {
            rest_server_config,
            contact_rate_limit_config,
            global_rate_limit_config,
            contact_feature_config,
            health_feature_config,
        })
    }
}

/// Wire the services together. All of them share the same smtp transport.
pub fn provide_rest_server(config: ConfigProvider, email: Email) -> anyhow::Result<RestServer> {
    let time = Time::default();

    let template = Template::new()?;
    let template_email = TemplateEmail::new(email.clone(), template);

    let contact = ContactFeature::new(time, template_email, config.contact_feature_config);
    let health = HealthFeature::new(time, email, config.health_feature_config);

    let contact_rate_limit = RateLimit::new(time, config.contact_rate_limit_config);
    let global_rate_limit = RateLimit::new(time, config.global_rate_limit_config);

    Ok(RestServer::new(
        time,
        health,
        contact,
        contact_rate_limit,
        global_rate_limit,
        config.rest_server_config,
    ))
}
