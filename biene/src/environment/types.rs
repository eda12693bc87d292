use biene_core_contact_impl::ContactFeatureServiceImpl;
use biene_core_health_impl::HealthFeatureServiceImpl;
use biene_email_impl::{template::TemplateEmailServiceImpl, EmailServiceImpl};
use biene_shared_impl::{rate_limit::RateLimitServiceImpl, time::TimeServiceImpl};
use biene_templates_impl::TemplateServiceImpl;

// API
pub type RestServer = biene_api_rest::RestServer<Time, HealthFeature, ContactFeature, RateLimit>;

// Email
pub type Email = EmailServiceImpl;
pub type TemplateEmail = TemplateEmailServiceImpl<Email, Template>;

// Shared
pub type Time = TimeServiceImpl;
pub type RateLimit = RateLimitServiceImpl<Time>;

// Templates
pub type Template = TemplateServiceImpl;

// Core
pub type ContactFeature = ContactFeatureServiceImpl<Time, TemplateEmail>;
pub type HealthFeature = HealthFeatureServiceImpl<Time, Email>;
