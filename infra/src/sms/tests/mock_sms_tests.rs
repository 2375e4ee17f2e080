//! Unit tests for the mock SMS service

use otp_core::services::SmsServiceTrait;

use crate::sms::{create_sms_service, MockSmsService};

#[tokio::test]
async fn test_mock_sms_send_success() {
    let service = MockSmsService::with_options(false, false);
    let message_id = service
        .send_verification_code("+15551234567", "123456")
        .await
        .unwrap();

    assert!(message_id.starts_with("mock_"));
    assert_eq!(service.get_message_count(), 1);
}

#[tokio::test]
async fn test_mock_sms_invalid_phone() {
    let service = MockSmsService::with_options(false, false);
    let result = service.send_verification_code("not-a-phone", "123456").await;

    let message = result.unwrap_err();
    assert!(message.contains("Invalid phone number"));
    assert_eq!(service.get_message_count(), 0);
}

#[tokio::test]
async fn test_mock_sms_simulate_failure() {
    let mut service = MockSmsService::with_options(false, false);
    service.set_simulate_failure(true);

    let result = service.send_verification_code("13812345678", "123456").await;
    assert_eq!(result.unwrap_err(), "Simulated SMS sending failure");
}

#[tokio::test]
async fn test_mock_sms_counter_shared_between_clones() {
    let service = MockSmsService::with_options(false, false);
    let clone = service.clone();

    for _ in 0..3 {
        clone.send_verification_code("+15551234567", "123456").await.unwrap();
    }
    assert_eq!(service.get_message_count(), 3);
}

#[test]
fn test_phone_validation() {
    let service = MockSmsService::new();
    assert!(service.is_valid_phone_number("+15551234567"));
    assert!(service.is_valid_phone_number("13812345678"));
    assert!(!service.is_valid_phone_number("12345"));
}

#[test]
fn test_unknown_provider_falls_back_to_mock() {
    let service = create_sms_service("carrier-pigeon");
    assert!(service.is_valid_phone_number("+15551234567"));
}
