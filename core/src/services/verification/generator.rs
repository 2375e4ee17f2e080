//! One-time code generation

use rand::{rngs::OsRng, Rng};

use crate::domain::entities::CODE_LENGTH;

/// Size of the code space: every 6-digit decimal string
const CODE_SPACE: u32 = 1_000_000;

/// Produces fresh one-time codes
pub trait CodeGenerator: Send + Sync {
    /// Generate a new code
    fn generate(&self) -> String;
}

/// Uniform 6-digit codes from the OS CSPRNG
///
/// `gen_range` rejects out-of-range samples, so every code in
/// `000000..=999999` is equally likely.
#[derive(Debug, Clone, Copy, Default)]
pub struct SecureCodeGenerator;

impl CodeGenerator for SecureCodeGenerator {
    fn generate(&self) -> String {
        let code = OsRng.gen_range(0..CODE_SPACE);
        format!("{:0width$}", code, width = CODE_LENGTH)
    }
}

/// Whether a candidate has the shape of a generated code
pub fn is_well_formed_code(candidate: &str) -> bool {
    candidate.len() == CODE_LENGTH && candidate.chars().all(|c| c.is_ascii_digit())
}
