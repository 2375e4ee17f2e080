//! Key identifying one code record: a business context plus a subject.

use otp_shared::phone::mask_phone_number;
use std::fmt;

use crate::errors::ValidationError;

/// Prefix of the storage key for every code record
pub const CODE_KEY_PREFIX: &str = "code";

/// `(biz, subject)` pair scoping a code record
///
/// The same subject can hold independent codes for different business
/// contexts ("login" vs "reset-password"). Both parts are non-blank, and the
/// biz part may not contain `:` so storage keys stay unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeKey {
    biz: String,
    subject: String,
}

impl CodeKey {
    /// Create a key, trimming surrounding whitespace from both parts
    pub fn new(biz: impl AsRef<str>, subject: impl AsRef<str>) -> Result<Self, ValidationError> {
        let biz = biz.as_ref().trim();
        let subject = subject.as_ref().trim();

        if biz.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "biz".to_string(),
            });
        }
        if subject.is_empty() {
            return Err(ValidationError::RequiredField {
                field: "subject".to_string(),
            });
        }
        if biz.contains(':') {
            return Err(ValidationError::InvalidFormat {
                field: "biz".to_string(),
            });
        }

        Ok(Self {
            biz: biz.to_string(),
            subject: subject.to_string(),
        })
    }

    /// Business context
    pub fn biz(&self) -> &str {
        &self.biz
    }

    /// Subject identifier (usually a phone number)
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// Storage key: `code:{biz}:{subject}`
    pub fn storage_key(&self) -> String {
        format!("{}:{}:{}", CODE_KEY_PREFIX, self.biz, self.subject)
    }

    /// Subject with everything but the edges masked, for logs
    pub fn masked_subject(&self) -> String {
        mask_phone_number(&self.subject)
    }
}

impl fmt::Display for CodeKey {
    /// Log-safe rendering; never prints the full subject
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", CODE_KEY_PREFIX, self.biz, self.masked_subject())
    }
}
