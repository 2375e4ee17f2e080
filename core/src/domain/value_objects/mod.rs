//! Value objects representing immutable domain concepts.

pub mod code_key;
pub mod code_policy;

// Re-export commonly used types
pub use code_key::CodeKey;
pub use code_policy::{
    CodePolicy, DEFAULT_CODE_TTL_SECONDS, DEFAULT_EXPIRED_RETENTION_SECONDS, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_RESEND_COOLDOWN_SECONDS,
};
