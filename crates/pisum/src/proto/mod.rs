//! Protobuf definitions and serialization for the protocol messages.
//!
//! The messages are defined in `pisum.proto`; `generated.rs` is produced from
//! it by `prost-build`. Integers are big-endian byte strings: ciphertexts use
//! the byte size of `n^2`, the Paillier modulus that of `n`, and group elements
//! are minimal.

#[allow(clippy::all)]
mod generated;
mod serialization;

pub use generated::*;

pub use serialization::MessageContext;
