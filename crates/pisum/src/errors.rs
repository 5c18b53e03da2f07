use std::time::Duration;
use thiserror::Error;

/// The Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum encapsulating all the possible errors from this library.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// Indicates that an error in the underlying mathematical library was
    /// encountered.
    #[error("{0}")]
    MathError(#[from] pisum_math::Error),

    /// Indicates a parameter error.
    #[error("{0}")]
    ParametersError(#[from] ParametersError),

    /// Indicates that no Paillier key pair could be generated.
    #[error("Key generation failed: {0}")]
    KeyGenerationError(String),

    /// Indicates that a plaintext does not lie in `[0, n)`.
    #[error("Plaintext out of range")]
    PlaintextOutOfRange,

    /// Indicates that no encryption randomness coprime to the modulus was
    /// found within the allowed number of attempts.
    #[error("Encryption failed after {0} attempts")]
    EncryptionFailure(usize),

    /// Indicates that a ciphertext does not lie in the ciphertext space.
    #[error("Ciphertext out of range")]
    DecryptionRangeError,

    /// Indicates that values that should be associated with the same key are
    /// not.
    #[error("Mismatched keys")]
    MismatchedKeys,

    /// Indicates that a protocol step was invoked out of order, or received a
    /// message inconsistent with the previous rounds.
    #[error("Protocol sequence error: {0}")]
    ProtocolSequenceError(String),

    /// Indicates that a protocol run exceeded its deadline.
    #[error("Protocol run exceeded its deadline of {0:?}")]
    Timeout(Duration),

    /// Indicates a serialization error.
    #[error("Serialization error")]
    SerializationError,

    /// Indicates that an input is invalid.
    #[error("{0}")]
    UnspecifiedInput(String),
}

/// Separate enum to indicate parameters-related errors.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ParametersError {
    /// Indicates that the group modulus is too small.
    #[error("The group modulus has {0} bits, below the minimum of {1}")]
    InsecureGroupSize(u64, u64),

    /// Indicates that the Paillier modulus is too small.
    #[error("The Paillier modulus has {0} bits, below the minimum of {1}")]
    InsecurePaillierSize(usize, usize),

    /// Indicates that the Paillier modulus size is invalid.
    #[error("Invalid Paillier modulus size: {0} is not an even number of at least 16 bits")]
    InvalidPaillierSize(usize),

    /// Indicates that too few primality testing rounds were requested.
    #[error("Too few primality testing rounds: {0} is below the minimum of {1}")]
    InvalidPrimalityRounds(usize, usize),

    /// Indicates an invalid bound on encryption nonce sampling.
    #[error("The number of nonce sampling attempts must be positive")]
    InvalidNonceAttempts,

    /// Indicates that a key does not have the configured size.
    #[error("Key size mismatch: expected {0} bits, found {1}")]
    KeySizeMismatch(usize, usize),
}

impl Error {
    /// Create a protocol sequence error.
    pub(crate) fn sequence<S: Into<String>>(msg: S) -> Self {
        Self::ProtocolSequenceError(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Error, ParametersError};
    use std::time::Duration;

    #[test]
    fn error_strings() {
        assert_eq!(
            Error::MathError(pisum_math::Error::NotInGroup).to_string(),
            "Value is not an element of the group"
        );
        assert_eq!(
            Error::ParametersError(ParametersError::InsecureGroupSize(1536, 2048)).to_string(),
            "The group modulus has 1536 bits, below the minimum of 2048"
        );
        assert_eq!(
            Error::ParametersError(ParametersError::KeySizeMismatch(2048, 1024)).to_string(),
            "Key size mismatch: expected 2048 bits, found 1024"
        );
        assert_eq!(
            Error::EncryptionFailure(128).to_string(),
            "Encryption failed after 128 attempts"
        );
        assert_eq!(
            Error::sequence("round 2 already processed").to_string(),
            "Protocol sequence error: round 2 already processed"
        );
        assert_eq!(
            Error::Timeout(Duration::from_secs(2)).to_string(),
            "Protocol run exceeded its deadline of 2s"
        );
        assert_eq!(Error::SerializationError.to_string(), "Serialization error");
    }

    #[test]
    fn math_errors_convert() {
        let e: Error = pisum_math::Error::InvalidExponent("zero".to_string()).into();
        assert_eq!(
            e,
            Error::MathError(pisum_math::Error::InvalidExponent("zero".to_string()))
        );
    }
}
