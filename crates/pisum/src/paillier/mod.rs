//! The Paillier additively homomorphic encryption scheme.

mod ciphertext;
mod keys;

pub use ciphertext::Ciphertext;
pub use keys::{DecryptionKey, EncryptionKey, KeyPair};
