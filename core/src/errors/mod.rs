//! Domain-specific error types and error handling.

mod types;

#[cfg(test)]
mod tests;

// Re-export all error types and utilities
pub use types::{
    extract_chinese_message, extract_english_message, CodeError, ErrorResponse, ValidationError,
};

use thiserror::Error;

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("SMS delivery failed: {message} | 短信发送失败: {message}")]
    Delivery { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Code(#[from] CodeError),

    #[error(transparent)]
    ValidationErr(#[from] ValidationError),
}

impl From<DomainError> for ErrorResponse {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Code(code_error) => code_error.into(),
            DomainError::ValidationErr(validation) => validation.into(),
            DomainError::Validation { .. } => ErrorResponse::new("VALIDATION_ERROR", err.to_string()),
            DomainError::Delivery { .. } => ErrorResponse::new("SMS_SERVICE_FAILURE", err.to_string()),
            DomainError::Internal { .. } => ErrorResponse::new("INTERNAL_ERROR", err.to_string()),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
