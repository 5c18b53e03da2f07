//! Protobuf serialization for the protocol types.

use super::generated::{
    EncryptionKey as EncryptionKeyProto, GroupParameters as GroupParametersProto,
    HashToGroup as HashToGroupProto, MaskedPair as MaskedPairProto,
    Parameters as ParametersProto, Round1 as Round1Proto, Round2 as Round2Proto,
    Round3 as Round3Proto,
};
use crate::paillier::{Ciphertext, EncryptionKey};
use crate::protocol::{MaskedPair, Round1Message, Round2Message, Round3Message};
use crate::{Error, ProtocolParameters, ProtocolParametersBuilder, Result};
use num_bigint::BigUint;
use pisum_math::zp::{DdhGroup, GroupElement, HashToGroup};
use pisum_traits::{Deserialize, DeserializeParametrized, DeserializeWithContext, Serialize};
use pisum_util::{byte_len, from_fixed_be, to_fixed_be};
use prost::Message;
use std::sync::Arc;

/// What a receiver needs to decode and validate round messages: the masking
/// group and the Paillier public key of party two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageContext {
    group: DdhGroup,
    key: Arc<EncryptionKey>,
}

impl MessageContext {
    /// Create a context from the protocol parameters and the public key of
    /// party two.
    pub fn new(par: &ProtocolParameters, key: Arc<EncryptionKey>) -> Self {
        Self {
            group: par.group().clone(),
            key,
        }
    }

    /// Returns the masking group.
    pub fn group(&self) -> &DdhGroup {
        &self.group
    }

    /// Returns the public key of party two.
    pub fn key(&self) -> &Arc<EncryptionKey> {
        &self.key
    }

    fn decode_element(&self, bytes: &[u8]) -> Result<GroupElement> {
        if bytes.is_empty()
            || bytes.len() > self.group.element_byte_len()
            || bytes.first() == Some(&0)
        {
            return Err(Error::SerializationError);
        }
        self.group
            .element(BigUint::from_bytes_be(bytes))
            .map_err(|_| Error::SerializationError)
    }

    fn decode_pair(&self, proto: &MaskedPairProto) -> Result<MaskedPair> {
        Ok(MaskedPair {
            masked: self.decode_element(&proto.masked)?,
            ciphertext: Ciphertext::from_bytes(&proto.ciphertext, &self.key)?,
        })
    }
}

impl From<&MaskedPair> for MaskedPairProto {
    fn from(pair: &MaskedPair) -> Self {
        MaskedPairProto {
            masked: pair.masked.value().to_bytes_be(),
            ciphertext: pair.ciphertext.to_bytes(),
        }
    }
}

impl From<&DdhGroup> for GroupParametersProto {
    fn from(group: &DdhGroup) -> Self {
        GroupParametersProto {
            p: group.p().to_bytes_be(),
            q: group.q().to_bytes_be(),
            g: group.g().to_bytes_be(),
        }
    }
}

impl From<HashToGroup> for HashToGroupProto {
    fn from(hash_to_group: HashToGroup) -> Self {
        match hash_to_group {
            HashToGroup::CofactorClearing => HashToGroupProto::CofactorClearing,
            HashToGroup::GeneratorExponent => HashToGroupProto::GeneratorExponent,
        }
    }
}

impl From<HashToGroupProto> for HashToGroup {
    fn from(hash_to_group: HashToGroupProto) -> Self {
        match hash_to_group {
            HashToGroupProto::CofactorClearing => HashToGroup::CofactorClearing,
            HashToGroupProto::GeneratorExponent => HashToGroup::GeneratorExponent,
        }
    }
}

impl From<&ProtocolParameters> for ParametersProto {
    fn from(par: &ProtocolParameters) -> Self {
        ParametersProto {
            group: Some(GroupParametersProto::from(par.group())),
            paillier_bits: par.paillier_bits() as u32,
            primality_rounds: par.primality_rounds() as u32,
            max_nonce_attempts: par.max_nonce_attempts() as u32,
            hash_to_group: HashToGroupProto::from(par.group().hash_to_group()) as i32,
        }
    }
}

impl Serialize for ProtocolParameters {
    fn to_bytes(&self) -> Vec<u8> {
        ParametersProto::from(self).encode_to_vec()
    }
}

impl ProtocolParameters {
    /// Decode parameters accepting moduli below 2048 bits.
    ///
    /// The encoding never carries this choice: only the receiver can make it,
    /// and only for tests and benchmarks.
    pub fn try_deserialize_insecure(bytes: &[u8]) -> Result<Self> {
        decode_parameters(bytes, true)
    }
}

impl Deserialize for ProtocolParameters {
    type Error = Error;

    /// The group is validated again, so decoding large parameters runs
    /// primality tests. Moduli below 2048 bits are rejected.
    fn try_deserialize(bytes: &[u8]) -> Result<Self> {
        decode_parameters(bytes, false)
    }
}

fn decode_parameters(bytes: &[u8], insecure: bool) -> Result<ProtocolParameters> {
    let proto: ParametersProto = Message::decode(bytes).map_err(|_| Error::SerializationError)?;
    let group_proto = proto.group.ok_or(Error::SerializationError)?;
    let hash_to_group =
        HashToGroupProto::try_from(proto.hash_to_group).map_err(|_| Error::SerializationError)?;

    let group = DdhGroup::new(
        BigUint::from_bytes_be(&group_proto.p),
        BigUint::from_bytes_be(&group_proto.q),
        BigUint::from_bytes_be(&group_proto.g),
    )?;

    let mut builder = ProtocolParametersBuilder::new();
    builder
        .set_group(group)
        .set_hash_to_group(hash_to_group.into())
        .set_paillier_bits(proto.paillier_bits as usize)
        .set_primality_rounds(proto.primality_rounds as usize)
        .set_max_nonce_attempts(proto.max_nonce_attempts as usize);
    if insecure {
        builder.allow_insecure_sizes();
    }
    builder.build()
}

impl Serialize for EncryptionKey {
    fn to_bytes(&self) -> Vec<u8> {
        let len = byte_len(self.bits() as u64);
        EncryptionKeyProto {
            n: to_fixed_be(self.n(), len).unwrap_or_else(|| self.n().to_bytes_be()),
        }
        .encode_to_vec()
    }
}

impl DeserializeWithContext for EncryptionKey {
    type Error = Error;
    type Context = ProtocolParameters;

    fn from_bytes(bytes: &[u8], ctx: &Arc<ProtocolParameters>) -> Result<Self> {
        let proto: EncryptionKeyProto =
            Message::decode(bytes).map_err(|_| Error::SerializationError)?;
        let n = from_fixed_be(&proto.n, byte_len(ctx.paillier_bits() as u64))
            .ok_or(Error::SerializationError)?;
        if n.bits() as usize != ctx.paillier_bits() {
            return Err(Error::SerializationError);
        }
        EncryptionKey::new(n, ctx.max_nonce_attempts()).map_err(|_| Error::SerializationError)
    }
}

impl Serialize for Round1Message {
    fn to_bytes(&self) -> Vec<u8> {
        Round1Proto {
            pairs: self.pairs.iter().map(MaskedPairProto::from).collect(),
        }
        .encode_to_vec()
    }
}

impl DeserializeWithContext for Round1Message {
    type Error = Error;
    type Context = MessageContext;

    fn from_bytes(bytes: &[u8], ctx: &Arc<MessageContext>) -> Result<Self> {
        let proto: Round1Proto = Message::decode(bytes).map_err(|_| Error::SerializationError)?;
        let pairs = proto
            .pairs
            .iter()
            .map(|pair| ctx.decode_pair(pair))
            .collect::<Result<Vec<_>>>()?;
        Ok(Round1Message { pairs })
    }
}

impl Serialize for Round2Message {
    fn to_bytes(&self) -> Vec<u8> {
        Round2Proto {
            pairs: self.pairs.iter().map(MaskedPairProto::from).collect(),
            peer_masked: self
                .peer_masked
                .iter()
                .map(|m| m.value().to_bytes_be())
                .collect(),
        }
        .encode_to_vec()
    }
}

impl DeserializeWithContext for Round2Message {
    type Error = Error;
    type Context = MessageContext;

    fn from_bytes(bytes: &[u8], ctx: &Arc<MessageContext>) -> Result<Self> {
        let proto: Round2Proto = Message::decode(bytes).map_err(|_| Error::SerializationError)?;
        let pairs = proto
            .pairs
            .iter()
            .map(|pair| ctx.decode_pair(pair))
            .collect::<Result<Vec<_>>>()?;
        let peer_masked = proto
            .peer_masked
            .iter()
            .map(|m| ctx.decode_element(m))
            .collect::<Result<Vec<_>>>()?;
        Ok(Round2Message { pairs, peer_masked })
    }
}

impl Serialize for Round3Message {
    fn to_bytes(&self) -> Vec<u8> {
        Round3Proto {
            intersection_size: self.intersection_size as u64,
            encrypted_sum: self.encrypted_sum.to_bytes(),
        }
        .encode_to_vec()
    }
}

impl DeserializeWithContext for Round3Message {
    type Error = Error;
    type Context = MessageContext;

    fn from_bytes(bytes: &[u8], ctx: &Arc<MessageContext>) -> Result<Self> {
        let proto: Round3Proto = Message::decode(bytes).map_err(|_| Error::SerializationError)?;
        Ok(Round3Message {
            intersection_size: usize::try_from(proto.intersection_size)
                .map_err(|_| Error::SerializationError)?,
            encrypted_sum: Ciphertext::from_bytes(&proto.encrypted_sum, &ctx.key)?,
        })
    }
}
