//! Source of one-time verification codes.

use rand::seq::SliceRandom;

/// Number of characters in a verification code.
pub const VERIFICATION_CODE_LENGTH: usize = 6;

/// Uppercase letters and digits without look-alikes (`0/O`, `1/I/L`).
const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Produces the codes embedded in magic links.
#[cfg_attr(test, mockall::automock)]
pub trait VerificationCodeGenerator: Send + Sync {
    /// Return a fresh code of [`VERIFICATION_CODE_LENGTH`] characters.
    fn generate(&self) -> String;
}

/// Generator backed by the thread-local random number generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomVerificationCodeGenerator;

impl VerificationCodeGenerator for RandomVerificationCodeGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::thread_rng();
        (0..VERIFICATION_CODE_LENGTH)
            .filter_map(|_| CODE_ALPHABET.choose(&mut rng))
            .map(|byte| char::from(*byte))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn random_codes_have_expected_shape() {
        let generator = RandomVerificationCodeGenerator;
        for _ in 0..50 {
            let code = generator.generate();
            assert_eq!(code.len(), VERIFICATION_CODE_LENGTH);
            assert!(code.bytes().all(|byte| CODE_ALPHABET.contains(&byte)));
        }
    }
}
