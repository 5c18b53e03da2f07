use thiserror::Error;

/// The Result type for this library.
pub type Result<T> = std::result::Result<T, Error>;

/// Enum encapsulating all the possible errors from this library.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum Error {
    /// Indicates that the group parameters are invalid.
    #[error("Invalid group parameter: {0}")]
    InvalidGroupParameter(String),

    /// Indicates that a value is not an element of the group.
    #[error("Value is not an element of the group")]
    NotInGroup,

    /// Indicates an invalid exponent.
    #[error("Invalid exponent: {0}")]
    InvalidExponent(String),

    /// Indicates an encoding of the wrong size.
    #[error("Invalid encoding: expected {0} bytes, found {1}")]
    InvalidEncoding(usize, usize),

    /// Indicates that hashing to the group did not produce an element.
    #[error("Hashing to the group failed after {0} attempts")]
    HashToGroupFailure(u32),
}
