//! The party holding a set of identifiers.

use super::{
    IntersectionSum, MaskedPair, Round1Message, Round2Message, Round3Message, SumDecryptor,
};
use crate::paillier::EncryptionKey;
use crate::{Error, ParametersError, ProtocolParameters, Result};
use itertools::Itertools;
use pisum_math::zp::{GroupElement, Scalar};
use pisum_util::shuffle;
use rand::{CryptoRng, RngCore};
use rayon::prelude::*;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;
use zeroize::Zeroizing;

/// Progress of a [`PartyOne`] through the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartyOneStage {
    /// Waiting for the public key of party two.
    AwaitingKey,
    /// Waiting for the round 1 message.
    AwaitingRound1,
    /// Round 2 was sent, waiting for the round 3 message.
    AwaitingRound3,
    /// The output was computed.
    Finished,
}

/// Party one of the protocol, which learns the output.
///
/// The masking exponent `k1` is sampled at construction and lives as long as
/// the engine; an engine runs the protocol once.
pub struct PartyOne {
    par: Arc<ProtocolParameters>,
    identifiers: Zeroizing<Vec<Vec<u8>>>,
    k1: Scalar,
    peer_key: Option<Arc<EncryptionKey>>,
    stage: PartyOneStage,
}

impl Debug for PartyOne {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartyOne")
            .field("identifiers", &self.identifiers.len())
            .field("stage", &self.stage)
            .finish_non_exhaustive()
    }
}

impl PartyOne {
    /// Create party one from its identifiers. Repeated identifiers are
    /// counted once.
    pub fn new<I, T, R>(identifiers: I, par: &Arc<ProtocolParameters>, rng: &mut R) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
        R: RngCore + CryptoRng,
    {
        let identifiers = identifiers
            .into_iter()
            .map(|id| id.as_ref().to_vec())
            .unique()
            .collect_vec();
        Self {
            par: par.clone(),
            identifiers: Zeroizing::new(identifiers),
            k1: par.group().random_scalar(rng),
            peer_key: None,
            stage: PartyOneStage::AwaitingKey,
        }
    }

    /// Returns the number of distinct identifiers.
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// Returns whether party one holds no identifier.
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Returns the current stage.
    pub const fn stage(&self) -> PartyOneStage {
        self.stage
    }

    /// Record the public key of party two, checking its size against the
    /// parameters.
    pub fn receive_public_key(&mut self, ek: Arc<EncryptionKey>) -> Result<()> {
        if self.stage != PartyOneStage::AwaitingKey {
            return Err(Error::sequence("public key already received"));
        }
        if ek.bits() != self.par.paillier_bits() {
            return Err(Error::ParametersError(ParametersError::KeySizeMismatch(
                self.par.paillier_bits(),
                ek.bits(),
            )));
        }
        self.peer_key = Some(ek);
        self.stage = PartyOneStage::AwaitingRound1;
        Ok(())
    }

    /// Process the round 1 message of party two.
    ///
    /// Each received identifier is masked with `k1` and kept with its
    /// ciphertext; the pairs are then shuffled. The own identifiers are hashed,
    /// masked with `k1` and shuffled independently.
    pub fn round2<R: RngCore + CryptoRng>(
        &mut self,
        msg: Round1Message,
        rng: &mut R,
    ) -> Result<Round2Message> {
        let ek = match (self.stage, &self.peer_key) {
            (PartyOneStage::AwaitingRound1, Some(ek)) => ek.clone(),
            (PartyOneStage::AwaitingKey, _) => {
                return Err(Error::sequence("public key of party two not received"))
            }
            _ => return Err(Error::sequence("round 2 already processed")),
        };
        let group = self.par.group();
        let k1 = &self.k1;

        let mut pairs = msg
            .pairs
            .into_par_iter()
            .map(|pair| -> Result<MaskedPair> {
                if !ek.owns(&pair.ciphertext) {
                    return Err(Error::sequence("ciphertext under a foreign key"));
                }
                if !group.contains(pair.masked.value()) {
                    return Err(Error::sequence("masked identifier outside the group"));
                }
                Ok(MaskedPair {
                    masked: group.power(&pair.masked, k1)?,
                    ciphertext: pair.ciphertext,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let mut peer_masked = self
            .identifiers
            .par_iter()
            .map(|id| -> Result<GroupElement> {
                let h = group.hash_to_element(id)?;
                Ok(group.power(&h, k1)?)
            })
            .collect::<Result<Vec<_>>>()?;

        shuffle(&mut pairs, rng);
        shuffle(&mut peer_masked, rng);

        debug!(
            received = pairs.len(),
            own = peer_masked.len(),
            "Party one computed round 2"
        );
        self.stage = PartyOneStage::AwaitingRound3;
        Ok(Round2Message { pairs, peer_masked })
    }

    /// Process the round 3 message of party two, decrypting the sum through
    /// `decryptor`.
    pub fn finalize<D: SumDecryptor + ?Sized>(
        &mut self,
        msg: Round3Message,
        decryptor: &mut D,
    ) -> Result<IntersectionSum> {
        if self.stage != PartyOneStage::AwaitingRound3 {
            return Err(Error::sequence("round 3 message received out of order"));
        }
        let ek = self
            .peer_key
            .as_ref()
            .ok_or_else(|| Error::sequence("public key of party two not received"))?;
        if !ek.owns(&msg.encrypted_sum) {
            return Err(Error::sequence("encrypted sum under a foreign key"));
        }
        if msg.intersection_size > self.identifiers.len() {
            return Err(Error::sequence(
                "intersection larger than the set of identifiers",
            ));
        }

        let sum = decryptor.decrypt_sum(&msg.encrypted_sum)?;
        self.stage = PartyOneStage::Finished;
        debug!(
            cardinality = msg.intersection_size,
            "Party one decrypted the intersection sum"
        );
        Ok(IntersectionSum {
            cardinality: msg.intersection_size,
            sum,
        })
    }
}
