//! The three-round PI-Sum protocol.
//!
//! [`PartyTwo`] sends its masked identifiers with encrypted values
//! ([`Round1Message`]), [`PartyOne`] masks them again and adds its own masked
//! identifiers ([`Round2Message`]), and [`PartyTwo`] answers with the size of
//! the intersection and the encrypted sum ([`Round3Message`]), which
//! [`PartyOne`] decrypts through a [`SumDecryptor`].

mod messages;
mod orchestrator;
mod party_one;
mod party_two;

pub use messages::{IntersectionSum, MaskedPair, Round1Message, Round2Message, Round3Message};
pub use orchestrator::{run_protocol, Orchestrator};
pub use party_one::{PartyOne, PartyOneStage};
pub use party_two::{PartyTwo, PartyTwoStage};

use crate::paillier::{Ciphertext, DecryptionKey};
use crate::Result;
use num_bigint::BigUint;
use pisum_traits::AheDecrypter;

/// Capability to decrypt the encrypted intersection sum.
pub trait SumDecryptor {
    /// Decrypt the encrypted sum.
    fn decrypt_sum(&mut self, ct: &Ciphertext) -> Result<BigUint>;
}

impl SumDecryptor for DecryptionKey {
    fn decrypt_sum(&mut self, ct: &Ciphertext) -> Result<BigUint> {
        self.try_decrypt(ct)
    }
}
