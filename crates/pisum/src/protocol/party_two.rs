//! The party holding identifiers with values.

use super::{MaskedPair, Round1Message, Round2Message, Round3Message, SumDecryptor};
use crate::paillier::{Ciphertext, EncryptionKey, KeyPair};
use crate::{Error, ProtocolParameters, Result};
use num_bigint::BigUint;
use pisum_math::zp::{GroupElement, Scalar};
use pisum_traits::{AheDecrypter, AheEncrypter};
use pisum_util::{fork_rngs, shuffle};
use rand::{CryptoRng, RngCore};
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;
use zeroize::Zeroizing;
use zeroize_derive::{Zeroize, ZeroizeOnDrop};

/// Progress of a [`PartyTwo`] through the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyTwoStage {
    /// Round 1 was not sent yet.
    Initialized,
    /// Round 1 was sent, waiting for the round 2 message.
    AwaitingRound2,
    /// Round 3 was sent, the encrypted sum can be decrypted once.
    AwaitingDecryption,
    /// The encrypted sum was decrypted.
    Finished,
}

#[derive(Zeroize, ZeroizeOnDrop)]
struct Entry {
    identifier: Vec<u8>,
    value: u64,
}

/// Party two of the protocol, which holds the Paillier key pair.
///
/// The masking exponent `k2` and the key pair are generated at construction
/// and live as long as the engine; an engine runs the protocol once. The
/// private key never leaves the engine: the sum is decrypted through the
/// [`SumDecryptor`] implementation, which only accepts the ciphertext output by
/// [`PartyTwo::round3`], and only once.
pub struct PartyTwo {
    par: Arc<ProtocolParameters>,
    entries: Zeroizing<Vec<Entry>>,
    k2: Scalar,
    keys: KeyPair,
    sent: HashSet<BigUint>,
    encrypted_sum: Option<Ciphertext>,
    stage: PartyTwoStage,
}

impl Debug for PartyTwo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartyTwo")
            .field("entries", &self.entries.len())
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

impl PartyTwo {
    /// Create party two from its identifiers and their values, generating a
    /// fresh Paillier key pair.
    ///
    /// Returns an error if an identifier is repeated, or if the sum of all the
    /// values does not fit below the Paillier modulus.
    pub fn new<I, T, R>(
        identifier_values: I,
        par: &Arc<ProtocolParameters>,
        rng: &mut R,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = (T, u64)>,
        T: AsRef<[u8]>,
        R: RngCore + CryptoRng,
    {
        let entries: Zeroizing<Vec<Entry>> = Zeroizing::new(
            identifier_values
                .into_iter()
                .map(|(identifier, value)| Entry {
                    identifier: identifier.as_ref().to_vec(),
                    value,
                })
                .collect(),
        );
        let distinct = {
            let mut seen = HashSet::with_capacity(entries.len());
            entries.iter().all(|e| seen.insert(e.identifier.as_slice()))
        };
        if !distinct {
            return Err(Error::UnspecifiedInput(
                "Repeated identifier in the input of party two".to_string(),
            ));
        }

        let keys = KeyPair::from_parameters(par, rng)?;
        let total: BigUint = entries.iter().map(|e| BigUint::from(e.value)).sum();
        if &total >= keys.encryption_key().n() {
            return Err(Error::PlaintextOutOfRange);
        }

        Ok(Self {
            par: par.clone(),
            entries,
            k2: par.group().random_scalar(rng),
            keys,
            sent: HashSet::new(),
            encrypted_sum: None,
            stage: PartyTwoStage::Initialized,
        })
    }

    /// Returns the number of identifiers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether party two holds no identifier.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the current stage.
    pub const fn stage(&self) -> PartyTwoStage {
        self.stage
    }

    /// Returns the public key, to be handed to party one.
    pub fn public_key(&self) -> Arc<EncryptionKey> {
        self.keys.encryption_key().clone()
    }

    /// Compute the round 1 message: every identifier is hashed and masked with
    /// `k2`, every value is encrypted, and the pairs are shuffled.
    pub fn round1<R: RngCore + CryptoRng>(&mut self, rng: &mut R) -> Result<Round1Message> {
        if self.stage != PartyTwoStage::Initialized {
            return Err(Error::sequence("round 1 already sent"));
        }
        let group = self.par.group();
        let k2 = &self.k2;
        let ek = self.keys.encryption_key();

        let rngs = fork_rngs(self.entries.len(), rng);
        let mut pairs = self
            .entries
            .par_iter()
            .zip(rngs.into_par_iter())
            .map(|(entry, mut rng)| -> Result<MaskedPair> {
                let h = group.hash_to_element(&entry.identifier)?;
                Ok(MaskedPair {
                    masked: group.power(&h, k2)?,
                    ciphertext: ek.try_encrypt(&BigUint::from(entry.value), &mut rng)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        shuffle(&mut pairs, rng);

        self.sent = pairs.iter().map(|p| p.ciphertext.value().clone()).collect();
        debug!(pairs = pairs.len(), "Party two computed round 1");
        self.stage = PartyTwoStage::AwaitingRound2;
        Ok(Round1Message { pairs })
    }

    /// Process the round 2 message of party one.
    ///
    /// The identifiers of party one are masked with `k2`, matched against the
    /// doubly-masked identifiers of party two, and the ciphertexts of the
    /// matches are added to a fresh encryption of zero.
    pub fn round3<R: RngCore + CryptoRng>(
        &mut self,
        msg: Round2Message,
        rng: &mut R,
    ) -> Result<Round3Message> {
        if self.stage != PartyTwoStage::AwaitingRound2 {
            return Err(Error::sequence("round 2 message received out of order"));
        }
        if msg.pairs.len() != self.sent.len() {
            return Err(Error::sequence(format!(
                "expected {} pairs, found {}",
                self.sent.len(),
                msg.pairs.len()
            )));
        }
        let group = self.par.group();
        let k2 = &self.k2;
        let ek = self.keys.encryption_key();

        let mut returned = HashSet::with_capacity(msg.pairs.len());
        let mut lookup: HashMap<GroupElement, Ciphertext> =
            HashMap::with_capacity(msg.pairs.len());
        for pair in msg.pairs {
            if !ek.owns(&pair.ciphertext) || !self.sent.contains(pair.ciphertext.value()) {
                return Err(Error::sequence("ciphertext not sent in round 1"));
            }
            if !returned.insert(pair.ciphertext.value().clone()) {
                return Err(Error::sequence("ciphertext returned twice"));
            }
            if lookup.insert(pair.masked, pair.ciphertext).is_some() {
                return Err(Error::sequence("repeated doubly-masked identifier"));
            }
        }
        if !lookup.par_iter().all(|(m, _)| group.contains(m.value())) {
            return Err(Error::sequence("masked identifier outside the group"));
        }

        let doubly_masked = msg
            .peer_masked
            .par_iter()
            .map(|m| -> Result<GroupElement> {
                if !group.contains(m.value()) {
                    return Err(Error::sequence("masked identifier outside the group"));
                }
                Ok(group.power(m, k2)?)
            })
            .collect::<Result<Vec<_>>>()?;

        let mut matched = HashSet::with_capacity(doubly_masked.len());
        let mut encrypted_sum = ek.encrypt_zero(rng)?;
        for m in &doubly_masked {
            if !matched.insert(m) {
                return Err(Error::sequence("repeated identifier of party one"));
            }
            if let Some(ct) = lookup.get(m) {
                encrypted_sum = ek.add(&encrypted_sum, ct)?;
            }
        }
        let intersection_size = doubly_masked
            .iter()
            .filter(|m| lookup.contains_key(*m))
            .count();

        debug!(
            peer = doubly_masked.len(),
            intersection_size, "Party two computed round 3"
        );
        self.sent.clear();
        self.encrypted_sum = Some(encrypted_sum.clone());
        self.stage = PartyTwoStage::AwaitingDecryption;
        Ok(Round3Message {
            intersection_size,
            encrypted_sum,
        })
    }
}

impl SumDecryptor for PartyTwo {
    fn decrypt_sum(&mut self, ct: &Ciphertext) -> Result<BigUint> {
        if self.stage != PartyTwoStage::AwaitingDecryption {
            return Err(Error::sequence("no encrypted sum to decrypt"));
        }
        if self.encrypted_sum.as_ref() != Some(ct) {
            return Err(Error::sequence(
                "only the encrypted sum of round 3 can be decrypted",
            ));
        }
        let sum = self.keys.decryption_key().try_decrypt(ct)?;
        self.encrypted_sum = None;
        self.stage = PartyTwoStage::Finished;
        Ok(sum)
    }
}
