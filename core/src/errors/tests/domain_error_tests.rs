//! Unit tests for domain error types

use crate::errors::{extract_chinese_message, extract_english_message};
use crate::errors::{CodeError, DomainError, ErrorResponse, ValidationError};

#[test]
fn test_code_error_messages_are_bilingual() {
    let message = CodeError::TooManyAttempts.to_string();
    assert!(message.contains("Maximum attempts exceeded"));
    assert!(message.contains("验证次数太多"));

    let message = CodeError::Throttled { retry_after_seconds: 42 }.to_string();
    assert!(message.contains("42 seconds"));
    assert!(message.contains("42 秒"));
}

#[test]
fn test_code_error_codes() {
    assert_eq!(CodeError::Throttled { retry_after_seconds: 1 }.error_code(), "CODE_SEND_TOO_FREQUENT");
    assert_eq!(CodeError::TooManyAttempts.error_code(), "CODE_VERIFY_TOO_MANY_TIMES");
    assert_eq!(CodeError::Expired.error_code(), "CODE_EXPIRED");
    assert_eq!(CodeError::NoActiveCode.error_code(), "CODE_NOT_FOUND");
    assert_eq!(CodeError::storage("boom").error_code(), "CODE_STORAGE_FAILURE");
}

#[test]
fn test_requires_new_code() {
    assert!(CodeError::TooManyAttempts.requires_new_code());
    assert!(CodeError::Expired.requires_new_code());
    assert!(CodeError::NoActiveCode.requires_new_code());
    assert!(!CodeError::Throttled { retry_after_seconds: 5 }.requires_new_code());
    assert!(!CodeError::storage("io").requires_new_code());
}

#[test]
fn test_throttled_response_carries_retry_after() {
    let response: ErrorResponse = CodeError::Throttled { retry_after_seconds: 30 }.into();
    assert_eq!(response.error, "CODE_SEND_TOO_FREQUENT");
    assert_eq!(response.details.unwrap()["retry_after_seconds"], 30);
}

#[test]
fn test_domain_error_conversion() {
    let response: ErrorResponse = DomainError::from(CodeError::Expired).into();
    assert_eq!(response.error, "CODE_EXPIRED");
    assert!(response.details.is_none());

    let response: ErrorResponse = DomainError::from(ValidationError::RequiredField {
        field: "biz".to_string(),
    })
    .into();
    assert_eq!(response.error, "REQUIRED_FIELD");
    assert!(response.message.contains("必填字段: biz"));

    let response: ErrorResponse = DomainError::Delivery {
        message: "gateway down".to_string(),
    }
    .into();
    assert_eq!(response.error, "SMS_SERVICE_FAILURE");
}

#[test]
fn test_message_extraction() {
    let message = CodeError::NoActiveCode.to_string();
    assert_eq!(
        extract_english_message(&message),
        "No active verification code. Please request a code first"
    );
    assert_eq!(extract_chinese_message(&message), "没有有效的验证码，请先获取验证码");

    let english_only = "Only English";
    assert_eq!(extract_english_message(english_only), "Only English");
    assert_eq!(extract_chinese_message(english_only), "Only English");
}
