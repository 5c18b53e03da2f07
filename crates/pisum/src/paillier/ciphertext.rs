//! Ciphertext type in the Paillier encryption scheme.

use super::keys::Modulus;
use super::EncryptionKey;
use crate::{Error, Result};
use num_bigint::BigUint;
use pisum_traits::{AheCiphertext, AheParametrized, DeserializeParametrized, Serialize};
use pisum_util::{byte_len, from_fixed_be, to_fixed_be};
use std::ops::Add;
use std::sync::Arc;

/// A ciphertext, bound to the encryption key that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ciphertext {
    pub(crate) value: BigUint,
    pub(crate) modulus: Arc<Modulus>,
}

impl Ciphertext {
    /// Create a ciphertext from its integer value, which must lie in
    /// `[0, n^2)`.
    pub fn new(value: BigUint, ek: &EncryptionKey) -> Result<Self> {
        if &value >= ek.n_squared() {
            return Err(Error::DecryptionRangeError);
        }
        Ok(Self {
            value,
            modulus: ek.modulus.clone(),
        })
    }

    /// The integer value of the ciphertext.
    pub fn value(&self) -> &BigUint {
        &self.value
    }
}

impl AheParametrized for Ciphertext {
    type Parameters = EncryptionKey;
}

impl AheCiphertext for Ciphertext {}

impl Serialize for Ciphertext {
    fn to_bytes(&self) -> Vec<u8> {
        let len = byte_len(self.modulus.n_squared.bits());
        to_fixed_be(&self.value, len).unwrap_or_else(|| self.value.to_bytes_be())
    }
}

impl DeserializeParametrized for Ciphertext {
    type Error = Error;

    fn from_bytes(bytes: &[u8], par: &Arc<EncryptionKey>) -> Result<Self> {
        let value =
            from_fixed_be(bytes, par.ciphertext_byte_len()).ok_or(Error::SerializationError)?;
        Self::new(value, par).map_err(|_| Error::SerializationError)
    }
}

impl Add<&Ciphertext> for &Ciphertext {
    type Output = Ciphertext;

    /// Homomorphic addition.
    ///
    /// # Panics
    ///
    /// Panics if the ciphertexts were produced under different keys; use
    /// [`EncryptionKey::add`] for a fallible version.
    fn add(self, rhs: &Ciphertext) -> Ciphertext {
        assert_eq!(self.modulus, rhs.modulus);
        Ciphertext {
            value: (&self.value * &rhs.value) % &self.modulus.n_squared,
            modulus: self.modulus.clone(),
        }
    }
}
