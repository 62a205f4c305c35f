use thiserror::Error;

use crate::models::TemplateType;

/// Shown when a failure has nothing user-facing to say
pub const GENERIC_FAILURE_MESSAGE: &str = "An unknown error occurred.";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("{var} environment variable not set.")]
    MissingCredential { var: String },

    #[error("Invalid template selected: {0}")]
    InvalidTemplate(TemplateType),

    /// `detail` is for the log only
    #[error("Failed to generate content. Please check the log for details.")]
    GenerationFailed { detail: String },
}

impl GenerationError {
    pub fn failed(detail: impl Into<String>) -> Self {
        Self::GenerationFailed {
            detail: detail.into(),
        }
    }

    /// Message the output panel shows for this error
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidTemplate(_) => GENERIC_FAILURE_MESSAGE.to_string(),
            other => {
                let message = other.to_string();
                if message.trim().is_empty() {
                    GENERIC_FAILURE_MESSAGE.to_string()
                } else {
                    message
                }
            }
        }
    }
}
