//! Unit tests for the code record transitions

use chrono::{Duration, TimeZone, Utc};

use crate::domain::entities::code_record::{retry_after_seconds, CodeRecord, VerifyOutcome};
use crate::domain::value_objects::CodePolicy;
use crate::errors::CodeError;

fn policy() -> CodePolicy {
    CodePolicy::from_seconds(600, 60, 3, 600).unwrap()
}

fn start() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

#[test]
fn test_issue_sets_fresh_state() {
    let record = CodeRecord::issue("123456", &policy(), start());

    assert_eq!(record.code, "123456");
    assert_eq!(record.attempts_remaining, 3);
    assert_eq!(record.issued_at, start());
    assert_eq!(record.expires_at, start() + Duration::minutes(10));
    assert!(!record.used);
    assert!(!record.is_expired(start()));
}

#[test]
fn test_reissue_within_cooldown_is_throttled() {
    let record = CodeRecord::issue("123456", &policy(), start());

    let result = record.check_reissue(&policy(), start() + Duration::seconds(15));
    assert_eq!(result, Err(CodeError::Throttled { retry_after_seconds: 45 }));

    let result = record.check_reissue(&policy(), start() + Duration::milliseconds(59_500));
    assert_eq!(result, Err(CodeError::Throttled { retry_after_seconds: 1 }));
}

#[test]
fn test_reissue_after_cooldown_is_allowed() {
    let record = CodeRecord::issue("123456", &policy(), start());

    assert!(record.check_reissue(&policy(), start() + Duration::seconds(60)).is_ok());
    assert!(record.check_reissue(&policy(), start() + Duration::hours(1)).is_ok());
}

#[test]
fn test_consumed_record_still_throttles_reissue() {
    let mut record = CodeRecord::issue("123456", &policy(), start());
    assert_eq!(record.verify("123456", start()), Ok(VerifyOutcome::Matched));

    assert!(matches!(
        record.check_reissue(&policy(), start() + Duration::seconds(5)),
        Err(CodeError::Throttled { .. })
    ));
}

#[test]
fn test_verify_match_marks_used() {
    let mut record = CodeRecord::issue("123456", &policy(), start());

    let outcome = record.verify("123456", start() + Duration::seconds(30)).unwrap();
    assert!(outcome.matched());
    assert!(record.used);
    assert_eq!(record.attempts_remaining, 3);

    // Consumed codes read as expired, even with the right code
    assert_eq!(
        record.verify("123456", start() + Duration::seconds(31)),
        Err(CodeError::Expired)
    );
}

#[test]
fn test_verify_mismatch_spends_attempts() {
    let mut record = CodeRecord::issue("123456", &policy(), start());

    assert_eq!(
        record.verify("000000", start()),
        Ok(VerifyOutcome::Mismatched { attempts_remaining: 2 })
    );
    assert_eq!(
        record.verify("000001", start()),
        Ok(VerifyOutcome::Mismatched { attempts_remaining: 1 })
    );
    assert_eq!(
        record.verify("000002", start()),
        Ok(VerifyOutcome::Mismatched { attempts_remaining: 0 })
    );
    assert_eq!(record.attempts_remaining, 0);
}

#[test]
fn test_exhausted_record_rejects_correct_code() {
    let mut record = CodeRecord::issue("123456", &policy(), start());
    for _ in 0..3 {
        record.verify("999999", start()).unwrap();
    }

    assert_eq!(record.verify("123456", start()), Err(CodeError::TooManyAttempts));
    assert_eq!(record.verify("123456", start()), Err(CodeError::TooManyAttempts));
    assert_eq!(record.attempts_remaining, 0);
    assert!(!record.used);
}

#[test]
fn test_verify_after_ttl_is_expired() {
    let mut record = CodeRecord::issue("123456", &policy(), start());

    let at_expiry = start() + Duration::minutes(10);
    assert!(record.is_expired(at_expiry));
    assert_eq!(record.verify("123456", at_expiry), Err(CodeError::Expired));
    assert_eq!(record.attempts_remaining, 3);
}

#[test]
fn test_expired_takes_precedence_over_exhausted() {
    let mut record = CodeRecord::issue("123456", &policy(), start());
    for _ in 0..3 {
        record.verify("999999", start()).unwrap();
    }

    assert_eq!(
        record.verify("123456", start() + Duration::minutes(11)),
        Err(CodeError::Expired)
    );
}

#[test]
fn test_evictable_after_retention() {
    let record = CodeRecord::issue("123456", &policy(), start());

    assert!(!record.is_evictable(&policy(), start() + Duration::minutes(19)));
    assert!(record.is_evictable(&policy(), start() + Duration::minutes(20)));
}

#[test]
fn test_candidate_of_different_length_never_matches() {
    let mut record = CodeRecord::issue("123456", &policy(), start());

    assert_eq!(
        record.verify("1234567", start()),
        Ok(VerifyOutcome::Mismatched { attempts_remaining: 2 })
    );
}

#[test]
fn test_retry_after_rounding() {
    assert_eq!(retry_after_seconds(Duration::seconds(45)), 45);
    assert_eq!(retry_after_seconds(Duration::milliseconds(44_001)), 45);
    assert_eq!(retry_after_seconds(Duration::milliseconds(1)), 1);
    assert_eq!(retry_after_seconds(Duration::zero()), 1);
    assert_eq!(retry_after_seconds(Duration::seconds(-3)), 1);
}

#[test]
fn test_outcome_helpers() {
    assert!(VerifyOutcome::Matched.matched());
    assert_eq!(VerifyOutcome::Matched.attempts_remaining(), None);

    let mismatch = VerifyOutcome::Mismatched { attempts_remaining: 1 };
    assert!(!mismatch.matched());
    assert_eq!(mismatch.attempts_remaining(), Some(1));
}
