use num_bigint::BigUint;
use sha2::{Digest, Sha256};

/// Domain separator for [`HashToGroup::CofactorClearing`].
const DOMAIN: &[u8] = b"pisum/hash-to-group/v1";

/// Number of extra bits drawn above the modulus size so that the reduction
/// modulo `p` is statistically close to uniform.
pub(crate) const EXPANSION_MARGIN_BITS: u64 = 128;

/// How identifiers are mapped to group elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashToGroup {
    /// Expand SHA-256 to `bits(p) + 128` bits, reduce modulo `p`, and raise
    /// to the cofactor `(p - 1) / q`; retry with an incremented counter when
    /// the result is `0` or `1`. The discrete logarithm of the output with
    /// respect to `g` is unknown.
    #[default]
    CofactorClearing,

    /// Compute `g^(SHA-256(id) mod q)`, replacing a zero exponent by `1`.
    /// The discrete logarithm of the output is public, and the exponent is
    /// slightly biased.
    GeneratorExponent,
}

/// Expand `identifier` into an integer of `out_bits` bits using SHA-256 in
/// counter mode.
pub(crate) fn expand(identifier: &[u8], counter: u32, out_bits: u64) -> BigUint {
    let blocks = out_bits.div_ceil(256) as u32;
    let mut bytes = Vec::with_capacity(blocks as usize * 32);
    for block in 0..blocks {
        let mut hasher = Sha256::new();
        hasher.update(DOMAIN);
        hasher.update(counter.to_be_bytes());
        hasher.update(block.to_be_bytes());
        hasher.update((identifier.len() as u64).to_be_bytes());
        hasher.update(identifier);
        bytes.extend_from_slice(&hasher.finalize());
    }
    BigUint::from_bytes_be(&bytes)
}

/// SHA-256 of `identifier` as an integer.
pub(crate) fn digest(identifier: &[u8]) -> BigUint {
    BigUint::from_bytes_be(&Sha256::digest(identifier))
}
