use crate::paillier::Ciphertext;
use num_bigint::BigUint;
use pisum_math::zp::GroupElement;

/// A masked identifier together with the encryption of its value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedPair {
    /// The identifier, masked by one or both parties.
    pub masked: GroupElement,
    /// The encrypted value attached to the identifier.
    pub ciphertext: Ciphertext,
}

/// Message sent by party two in round 1: its shuffled singly-masked
/// identifiers with their encrypted values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round1Message {
    /// The pairs `(H(id)^k2, Enc(value))`.
    pub pairs: Vec<MaskedPair>,
}

/// Message sent by party one in round 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round2Message {
    /// The pairs of round 1 with each identifier masked again, shuffled.
    pub pairs: Vec<MaskedPair>,
    /// The singly-masked identifiers of party one, shuffled independently.
    pub peer_masked: Vec<GroupElement>,
}

/// Message sent by party two in round 3.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Round3Message {
    /// The number of common identifiers.
    pub intersection_size: usize,
    /// The encryption of the sum of the values of the common identifiers.
    pub encrypted_sum: Ciphertext,
}

/// The output of the protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionSum {
    /// The number of common identifiers.
    pub cardinality: usize,
    /// The sum of the values attached to the common identifiers.
    pub sum: BigUint,
}
