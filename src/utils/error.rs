use crate::domain::model::ErrorDetail;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum IdentifyError {
    #[error("Validation error: {message}")]
    LocalValidation { message: String },

    #[error("Image decode error: {message}")]
    Decode { message: String },

    #[error("API request failed: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
        body: Option<String>,
    },

    #[error("Unexpected API response: {message}")]
    InvalidResponse {
        message: String,
        body: Option<String>,
    },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Decode,
    Transport,
    Configuration,
    System,
}

impl IdentifyError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::LocalValidation {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::LocalValidation { .. } => ErrorCategory::Validation,
            Self::Decode { .. } => ErrorCategory::Decode,
            Self::Transport { .. } | Self::InvalidResponse { .. } => ErrorCategory::Transport,
            Self::InvalidConfigValue { .. } | Self::ConfigParse { .. } => {
                ErrorCategory::Configuration
            }
            Self::Io(_) => ErrorCategory::System,
        }
    }

    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }

    pub fn server_body(&self) -> Option<&str> {
        match self {
            Self::Transport { body, .. } | Self::InvalidResponse { body, .. } => body.as_deref(),
            _ => None,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::LocalValidation { message } => message.clone(),
            Self::Decode { message } => format!("The uploaded file is not a readable image ({})", message),
            Self::Transport {
                status: Some(code),
                ..
            } => format!("The identification service rejected the request (HTTP {})", code),
            Self::Transport { message, .. } => {
                format!("Could not reach the identification service: {}", message)
            }
            Self::InvalidResponse { .. } => {
                "The identification service returned a response that could not be read".to_string()
            }
            Self::InvalidConfigValue { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
            Self::ConfigParse { message } => format!("Configuration could not be loaded: {}", message),
            Self::Io(e) => format!("File access failed: {}", e),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::LocalValidation { .. } => {
                "Provide an API key and a non-empty .jpg, .jpeg or .png image"
            }
            Self::Decode { .. } => "Re-export the photo as JPEG or PNG and submit it again",
            Self::Transport {
                status: Some(401 | 403),
                ..
            } => "Check that the API key is valid and has remaining quota",
            Self::Transport {
                status: Some(400),
                ..
            } => "Check the organs/project parameter placement against the API documentation",
            Self::Transport { .. } => "Check the network connection and submit the image again",
            Self::InvalidResponse { .. } => "Verify the configured endpoint points at the identify API",
            Self::InvalidConfigValue { .. } | Self::ConfigParse { .. } => {
                "Fix the configuration file or command line flags"
            }
            Self::Io(_) => "Check that the file exists and is readable",
        }
    }

    /// Flattens the error into what the render surface shows.
    pub fn detail(&self) -> ErrorDetail {
        let message = match self {
            Self::LocalValidation { message } => message.clone(),
            _ => self.to_string(),
        };
        ErrorDetail {
            http_status: self.http_status(),
            message,
            server_body: self.server_body().map(str::to_string),
        }
    }
}

pub type Result<T> = std::result::Result<T, IdentifyError>;
