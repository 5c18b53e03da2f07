#![crate_name = "pisum_traits"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Traits for additively homomorphic encryption and for the messages exchanged
//! by the PI-Sum protocol.

use rand::{CryptoRng, RngCore};
use std::sync::Arc;

/// The parameters of an additively homomorphic encryption scheme.
pub trait AheParameters {}

/// Indicates that an object is parametrized.
pub trait AheParametrized {
    /// The type of the parameters.
    type Parameters: AheParameters;
}

/// Indicates that an object is a ciphertext of an additively homomorphic
/// encryption scheme.
pub trait AheCiphertext: AheParametrized {}

/// Encrypt a plaintext into a ciphertext.
pub trait AheEncrypter<P, C: AheCiphertext> {
    /// The type of error returned.
    type Error;

    /// Try to encrypt a plaintext, drawing the encryption randomness from
    /// `rng`.
    fn try_encrypt<R: RngCore + CryptoRng>(&self, pt: &P, rng: &mut R) -> Result<C, Self::Error>;
}

/// Decrypt a ciphertext into a plaintext.
pub trait AheDecrypter<P, C: AheCiphertext> {
    /// The type of error returned.
    type Error;

    /// Try to decrypt a ciphertext.
    fn try_decrypt(&self, ct: &C) -> Result<P, Self::Error>;
}

/// Serialization.
pub trait Serialize {
    /// Serialize `Self` into a vector of bytes.
    fn to_bytes(&self) -> Vec<u8>;
}

/// Deserialization without context.
pub trait Deserialize
where
    Self: Sized,
{
    /// The type of error returned.
    type Error;

    /// Attempt to deserialize from a vector of bytes.
    fn try_deserialize(bytes: &[u8]) -> Result<Self, Self::Error>;
}

/// Deserialization of a parametrized value.
pub trait DeserializeParametrized
where
    Self: Sized,
    Self: AheParametrized,
{
    /// The type of error returned.
    type Error;

    /// Attempt to deserialize from a vector of bytes.
    fn from_bytes(bytes: &[u8], par: &Arc<Self::Parameters>) -> Result<Self, Self::Error>;
}

/// Deserialization setting an explicit context.
pub trait DeserializeWithContext
where
    Self: Sized,
{
    /// The type of error returned.
    type Error;

    /// The type of context.
    type Context;

    /// Attempt to deserialize from a vector of bytes.
    fn from_bytes(bytes: &[u8], ctx: &Arc<Self::Context>) -> Result<Self, Self::Error>;
}
