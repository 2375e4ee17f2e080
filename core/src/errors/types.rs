//! Error types for one-time-code operations
//!
//! Display messages are bilingual (English | Chinese) so the presentation layer
//! can pick a language with `extract_english_message`/`extract_chinese_message`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Outcomes of the issue/verify transitions that are not a plain success
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    #[error("Too many requests. Please try again in {retry_after_seconds} seconds | 发送验证码太频繁，请在 {retry_after_seconds} 秒后重试")]
    Throttled { retry_after_seconds: u64 },

    #[error("Maximum attempts exceeded. Please request a new code | 验证次数太多，请重新获取验证码")]
    TooManyAttempts,

    #[error("Verification code expired. Please request a new code | 验证码已失效，请重新获取验证码")]
    Expired,

    #[error("No active verification code. Please request a code first | 没有有效的验证码，请先获取验证码")]
    NoActiveCode,

    #[error("Code storage failure: {message} | 验证码存储服务异常: {message}")]
    Storage { message: String },
}

impl CodeError {
    /// Build a storage failure from any displayable cause
    pub fn storage(cause: impl std::fmt::Display) -> Self {
        CodeError::Storage {
            message: cause.to_string(),
        }
    }

    /// Stable machine-readable code
    pub fn error_code(&self) -> &'static str {
        match self {
            CodeError::Throttled { .. } => "CODE_SEND_TOO_FREQUENT",
            CodeError::TooManyAttempts => "CODE_VERIFY_TOO_MANY_TIMES",
            CodeError::Expired => "CODE_EXPIRED",
            CodeError::NoActiveCode => "CODE_NOT_FOUND",
            CodeError::Storage { .. } => "CODE_STORAGE_FAILURE",
        }
    }

    /// Whether the caller should prompt the user to request a new code
    pub fn requires_new_code(&self) -> bool {
        matches!(
            self,
            CodeError::TooManyAttempts | CodeError::Expired | CodeError::NoActiveCode
        )
    }
}

/// Validation errors with bilingual messages
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Field required: {field} | 必填字段: {field}")]
    RequiredField { field: String },

    #[error("Invalid format for field: {field} | 字段格式无效: {field}")]
    InvalidFormat { field: String },

    #[error("Value out of range for field: {field} (min: {min}, max: {max}) | 字段值超出范围: {field} (最小: {min}, 最大: {max})")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    #[error("Invalid length for field: {field} (expected: {expected}, actual: {actual}) | 字段长度无效: {field} (期望: {expected}, 实际: {actual})")]
    InvalidLength {
        field: String,
        expected: usize,
        actual: usize,
    },
}

impl ValidationError {
    fn error_code(&self) -> &'static str {
        match self {
            ValidationError::RequiredField { .. } => "REQUIRED_FIELD",
            ValidationError::InvalidFormat { .. } => "INVALID_FORMAT",
            ValidationError::OutOfRange { .. } => "OUT_OF_RANGE",
            ValidationError::InvalidLength { .. } => "INVALID_LENGTH",
        }
    }
}

/// Unified error response structure for callers that render errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub error: String,
    /// Human-readable error message (bilingual)
    pub message: String,
    /// Additional error details if available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
    /// Timestamp when the error occurred
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    /// Create a new error response
    pub fn new(error: impl ToString, message: impl ToString) -> Self {
        Self {
            error: error.to_string(),
            message: message.to_string(),
            details: None,
            timestamp: Utc::now(),
        }
    }

    /// Add a single detail to the error response
    pub fn with_detail(mut self, key: impl ToString, value: serde_json::Value) -> Self {
        let mut details = self.details.unwrap_or_default();
        details.insert(key.to_string(), value);
        self.details = Some(details);
        self
    }
}

impl From<CodeError> for ErrorResponse {
    fn from(err: CodeError) -> Self {
        let response = ErrorResponse::new(err.error_code(), err.to_string());
        match err {
            CodeError::Throttled { retry_after_seconds } => {
                response.with_detail("retry_after_seconds", serde_json::json!(retry_after_seconds))
            }
            _ => response,
        }
    }
}

impl From<ValidationError> for ErrorResponse {
    fn from(err: ValidationError) -> Self {
        ErrorResponse::new(err.error_code(), err.to_string())
    }
}

/// Helper function to extract English message from bilingual error
pub fn extract_english_message(message: &str) -> &str {
    message.split(" | ").next().unwrap_or(message)
}

/// Helper function to extract Chinese message from bilingual error
pub fn extract_chinese_message(message: &str) -> &str {
    message.split(" | ").nth(1).unwrap_or(message)
}
