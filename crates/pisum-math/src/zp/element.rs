use num_bigint::BigUint;
use std::fmt::{Debug, Formatter};
use zeroize::Zeroizing;

/// An element of the order-q subgroup of a [`DdhGroup`](super::DdhGroup).
///
/// Elements are only created by the group, either by hashing, by
/// exponentiation, or by checked decoding, so every value is a subgroup
/// member.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupElement(pub(crate) BigUint);

impl GroupElement {
    /// The integer representative of the element, in `[1, p)`.
    pub fn value(&self) -> &BigUint {
        &self.0
    }
}

/// A private exponent in `[1, q - 1]`.
///
/// The value is held as big-endian bytes that are wiped when the scalar is
/// dropped, and is redacted from `Debug` output. Exponentiation works on a
/// transient `BigUint` copy, which `num-bigint` gives no way to wipe.
#[derive(Clone)]
pub struct Scalar {
    bytes: Zeroizing<Vec<u8>>,
}

impl Scalar {
    pub(crate) fn from_biguint(value: &BigUint) -> Self {
        Self {
            bytes: Zeroizing::new(value.to_bytes_be()),
        }
    }

    pub(crate) fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_be(&self.bytes)
    }
}

impl Debug for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("Scalar(<redacted>)")
    }
}
