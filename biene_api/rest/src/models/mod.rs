use biene_models::contact::ValidationError;
use chrono::{DateTime, Utc};
use serde::Serialize;

pub mod contact;

/// The envelope of every json response.
#[derive(Debug, Serialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationError>>,
}

impl ApiResponse {
    pub fn message(success: bool, message: &'static str) -> Self {
        Self {
            success,
            message: Some(message),
            error: None,
            errors: None,
        }
    }

    pub fn error(error: &'static str) -> Self {
        Self {
            success: false,
            message: None,
            error: Some(error),
            errors: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiHealth {
    pub success: bool,
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}
