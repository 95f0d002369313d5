use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

/// Caller-facing rendering of an error, shaped for the form or panel that
/// triggered the failing operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Offending input fields, in the order reported by the validator.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

impl AppError {
    /// Stable short code, used as a metrics label and in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation",
            AppError::BadRequest(_) => "bad_request",
            AppError::InternalError(_) => "internal",
            AppError::ConfigError(_) => "config",
        }
    }

    pub fn to_report(&self) -> ErrorReport {
        match self {
            AppError::ValidationError(errs) => {
                let mut fields: Vec<String> =
                    errs.field_errors().keys().map(|k| k.to_string()).collect();
                fields.sort();
                ErrorReport {
                    error: "Validation error".to_string(),
                    details: Some(errs.to_string()),
                    fields,
                }
            }
            AppError::BadRequest(err) => ErrorReport {
                error: err.to_string(),
                details: None,
                fields: Vec::new(),
            },
            AppError::InternalError(err) => ErrorReport {
                error: "Internal error".to_string(),
                details: Some(format!("{:#}", err)),
                fields: Vec::new(),
            },
            AppError::ConfigError(err) => ErrorReport {
                error: "Configuration error".to_string(),
                details: Some(err.to_string()),
                fields: Vec::new(),
            },
        }
    }

    /// JSON body for the report; falls back to the bare message.
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.to_report()).unwrap_or_else(|_| self.to_string())
    }
}
