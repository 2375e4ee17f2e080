//! Domain entities representing core business objects.

pub mod code_record;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use code_record::{retry_after_seconds, CodeRecord, VerifyOutcome, CODE_LENGTH};
