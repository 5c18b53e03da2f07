#![allow(missing_docs)]
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GroupParameters {
    #[prost(bytes = "vec", tag = "1")]
    pub p: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub q: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub g: ::prost::alloc::vec::Vec<u8>,
}
/// Shared protocol parameters. Whether moduli below 2048 bits are accepted is
/// a local decision of the receiver and is not encoded.
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Parameters {
    #[prost(message, optional, tag = "1")]
    pub group: ::core::option::Option<GroupParameters>,
    #[prost(uint32, tag = "2")]
    pub paillier_bits: u32,
    #[prost(uint32, tag = "3")]
    pub primality_rounds: u32,
    #[prost(uint32, tag = "4")]
    pub max_nonce_attempts: u32,
    #[prost(enumeration = "HashToGroup", tag = "5")]
    pub hash_to_group: i32,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct EncryptionKey {
    #[prost(bytes = "vec", tag = "1")]
    pub n: ::prost::alloc::vec::Vec<u8>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct MaskedPair {
    #[prost(bytes = "vec", tag = "1")]
    pub masked: ::prost::alloc::vec::Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub ciphertext: ::prost::alloc::vec::Vec<u8>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Round1 {
    #[prost(message, repeated, tag = "1")]
    pub pairs: ::prost::alloc::vec::Vec<MaskedPair>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Round2 {
    #[prost(message, repeated, tag = "1")]
    pub pairs: ::prost::alloc::vec::Vec<MaskedPair>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub peer_masked: ::prost::alloc::vec::Vec<::prost::alloc::vec::Vec<u8>>,
}
#[allow(clippy::derive_partial_eq_without_eq)]
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Round3 {
    #[prost(uint64, tag = "1")]
    pub intersection_size: u64,
    #[prost(bytes = "vec", tag = "2")]
    pub encrypted_sum: ::prost::alloc::vec::Vec<u8>,
}
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum HashToGroup {
    CofactorClearing = 0,
    GeneratorExponent = 1,
}
impl HashToGroup {
    /// String value of the enum field names used in the ProtoBuf definition.
    ///
    /// The values are not transformed in any way and thus are considered stable
    /// (if the ProtoBuf definition does not change) and safe for programmatic use.
    pub fn as_str_name(&self) -> &'static str {
        match self {
            HashToGroup::CofactorClearing => "COFACTOR_CLEARING",
            HashToGroup::GeneratorExponent => "GENERATOR_EXPONENT",
        }
    }
    /// Creates an enum from field names used in the ProtoBuf definition.
    pub fn from_str_name(value: &str) -> ::core::option::Option<Self> {
        match value {
            "COFACTOR_CLEARING" => Some(Self::CofactorClearing),
            "GENERATOR_EXPONENT" => Some(Self::GeneratorExponent),
            _ => None,
        }
    }
}
