//! Unit tests for the Redis code store helpers

use otp_core::domain::entities::VerifyOutcome;
use otp_core::domain::value_objects::CodeKey;
use otp_core::errors::CodeError;

use crate::cache::redis_code_store::{decode_issue_reply, decode_verify_reply, hash_code};
use crate::cache::CacheConfig;

#[test]
fn test_hash_code_is_sha256_hex() {
    assert_eq!(
        hash_code("123456"),
        "8d969eef6ecad3c29a3a629280e686cf0c3f5d5a86aff3ca12020c923adc6c92"
    );
    assert_ne!(hash_code("123456"), hash_code("123457"));
}

#[test]
fn test_storage_key_layout() {
    let key = CodeKey::new("login", "+15551234567").unwrap();

    let plain = CacheConfig::default();
    assert_eq!(plain.make_key(&key.storage_key()), "code:login:+15551234567");

    let prefixed = CacheConfig::default().with_prefix("otp");
    assert_eq!(
        prefixed.make_key(&key.storage_key()),
        "otp:code:login:+15551234567"
    );
}

#[test]
fn test_decode_issue_reply() {
    assert_eq!(decode_issue_reply(&[0, 0]), Ok(()));
    assert_eq!(
        decode_issue_reply(&[-1, 44_001]),
        Err(CodeError::Throttled { retry_after_seconds: 45 })
    );
    assert_eq!(
        decode_issue_reply(&[-1, 1]),
        Err(CodeError::Throttled { retry_after_seconds: 1 })
    );
    assert!(matches!(decode_issue_reply(&[-2, 0]), Err(CodeError::Storage { .. })));
}

#[test]
fn test_decode_verify_reply() {
    assert_eq!(decode_verify_reply(&[10, 3]), Ok(VerifyOutcome::Matched));
    assert_eq!(
        decode_verify_reply(&[11, 0]),
        Ok(VerifyOutcome::Mismatched { attempts_remaining: 0 })
    );
    assert_eq!(decode_verify_reply(&[-10, 0]), Err(CodeError::TooManyAttempts));
    assert_eq!(decode_verify_reply(&[-11, 0]), Err(CodeError::Expired));
    assert_eq!(decode_verify_reply(&[-12, 0]), Err(CodeError::NoActiveCode));
    assert!(matches!(decode_verify_reply(&[-13, 0]), Err(CodeError::Storage { .. })));
}

#[test]
fn test_unexpected_replies_are_storage_errors() {
    assert!(matches!(decode_issue_reply(&[]), Err(CodeError::Storage { .. })));
    assert!(matches!(decode_issue_reply(&[7, 0]), Err(CodeError::Storage { .. })));
    assert!(matches!(decode_verify_reply(&[10]), Err(CodeError::Storage { .. })));
    assert!(matches!(decode_verify_reply(&[11, -1]), Err(CodeError::Storage { .. })));
}
