//! Create parameters for the PI-Sum protocol

use crate::{Error, ParametersError, Result};
use pisum_math::zp::{DdhGroup, HashToGroup};
use pisum_util::DEFAULT_PRIMALITY_ROUNDS;
use std::sync::Arc;

/// Minimum size in bits of the group and Paillier moduli.
pub(crate) const MIN_SECURE_BITS: usize = 2048;

/// Default bound on the number of attempts to sample Paillier encryption
/// randomness.
pub(crate) const DEFAULT_MAX_NONCE_ATTEMPTS: usize = 128;

/// Parameters shared by both parties of the PI-Sum protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtocolParameters {
    /// The group in which identifiers are masked.
    group: DdhGroup,

    /// Size of the Paillier modulus `n`.
    paillier_bits: usize,

    /// Number of Miller-Rabin rounds used when generating Paillier primes.
    primality_rounds: usize,

    /// Bound on the number of attempts to sample encryption randomness.
    max_nonce_attempts: usize,

    /// Whether moduli below 2048 bits are accepted.
    insecure: bool,
}

impl ProtocolParameters {
    /// Returns the masking group.
    pub fn group(&self) -> &DdhGroup {
        &self.group
    }

    /// Returns the size of the Paillier modulus in bits.
    pub const fn paillier_bits(&self) -> usize {
        self.paillier_bits
    }

    /// Returns the number of primality testing rounds.
    pub const fn primality_rounds(&self) -> usize {
        self.primality_rounds
    }

    /// Returns the bound on encryption randomness sampling.
    pub const fn max_nonce_attempts(&self) -> usize {
        self.max_nonce_attempts
    }

    /// Returns whether these parameters were built with
    /// [`ProtocolParametersBuilder::allow_insecure_sizes`].
    pub const fn allows_insecure_sizes(&self) -> bool {
        self.insecure
    }

    /// Default parameters: the 2048-bit MODP group, a 2048-bit Paillier
    /// modulus, 20 primality rounds and 128 nonce attempts.
    pub fn default_arc() -> Arc<Self> {
        Arc::new(Self {
            group: DdhGroup::modp_2048(),
            paillier_bits: MIN_SECURE_BITS,
            primality_rounds: DEFAULT_PRIMALITY_ROUNDS,
            max_nonce_attempts: DEFAULT_MAX_NONCE_ATTEMPTS,
            insecure: false,
        })
    }
}

/// Builder for parameters for the PI-Sum protocol.
#[derive(Debug)]
pub struct ProtocolParametersBuilder {
    group: DdhGroup,
    hash_to_group: HashToGroup,
    paillier_bits: usize,
    primality_rounds: usize,
    max_nonce_attempts: usize,
    insecure: bool,
}

impl ProtocolParametersBuilder {
    /// Creates a new instance of the builder, holding the default parameters.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            group: DdhGroup::modp_2048(),
            hash_to_group: HashToGroup::default(),
            paillier_bits: MIN_SECURE_BITS,
            primality_rounds: DEFAULT_PRIMALITY_ROUNDS,
            max_nonce_attempts: DEFAULT_MAX_NONCE_ATTEMPTS,
            insecure: false,
        }
    }

    /// Sets the masking group.
    pub fn set_group(&mut self, group: DdhGroup) -> &mut Self {
        self.hash_to_group = group.hash_to_group();
        self.group = group;
        self
    }

    /// Sets the size of the Paillier modulus. Building fails if the size is
    /// odd or smaller than 16 bits.
    pub fn set_paillier_bits(&mut self, bits: usize) -> &mut Self {
        self.paillier_bits = bits;
        self
    }

    /// Sets the number of primality testing rounds. Building fails below 20.
    pub fn set_primality_rounds(&mut self, rounds: usize) -> &mut Self {
        self.primality_rounds = rounds;
        self
    }

    /// Sets the bound on the number of attempts to sample encryption
    /// randomness coprime to the Paillier modulus.
    pub fn set_max_nonce_attempts(&mut self, attempts: usize) -> &mut Self {
        self.max_nonce_attempts = attempts;
        self
    }

    /// Sets how identifiers are mapped to group elements.
    pub fn set_hash_to_group(&mut self, hash_to_group: HashToGroup) -> &mut Self {
        self.hash_to_group = hash_to_group;
        self
    }

    /// Accept group and Paillier moduli smaller than 2048 bits.
    ///
    /// This is only meant for tests and benchmarks.
    pub fn allow_insecure_sizes(&mut self) -> &mut Self {
        self.insecure = true;
        self
    }

    /// Build a new `ProtocolParameters` inside an `Arc`.
    pub fn build_arc(&self) -> Result<Arc<ProtocolParameters>> {
        self.build().map(Arc::new)
    }

    /// Build a new `ProtocolParameters`.
    pub fn build(&self) -> Result<ProtocolParameters> {
        if self.paillier_bits < 16 || self.paillier_bits % 2 == 1 {
            return Err(Error::ParametersError(
                ParametersError::InvalidPaillierSize(self.paillier_bits),
            ));
        }
        if !self.insecure {
            if self.group.modulus_bits() < MIN_SECURE_BITS as u64 {
                return Err(Error::ParametersError(ParametersError::InsecureGroupSize(
                    self.group.modulus_bits(),
                    MIN_SECURE_BITS as u64,
                )));
            }
            if self.paillier_bits < MIN_SECURE_BITS {
                return Err(Error::ParametersError(
                    ParametersError::InsecurePaillierSize(self.paillier_bits, MIN_SECURE_BITS),
                ));
            }
        }
        if self.primality_rounds < DEFAULT_PRIMALITY_ROUNDS {
            return Err(Error::ParametersError(
                ParametersError::InvalidPrimalityRounds(
                    self.primality_rounds,
                    DEFAULT_PRIMALITY_ROUNDS,
                ),
            ));
        }
        if self.max_nonce_attempts == 0 {
            return Err(Error::ParametersError(
                ParametersError::InvalidNonceAttempts,
            ));
        }

        Ok(ProtocolParameters {
            group: self.group.clone().with_hash_to_group(self.hash_to_group),
            paillier_bits: self.paillier_bits,
            primality_rounds: self.primality_rounds,
            max_nonce_attempts: self.max_nonce_attempts,
            insecure: self.insecure,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ProtocolParameters, ProtocolParametersBuilder};
    use crate::{Error, ParametersError};
    use pisum_math::zp::{DdhGroup, HashToGroup};
    use std::error::Error as StdError;

    #[test]
    fn default_parameters() -> Result<(), Box<dyn StdError>> {
        let built = ProtocolParametersBuilder::new().build_arc()?;
        assert_eq!(built, ProtocolParameters::default_arc());
        assert_eq!(built.group(), &DdhGroup::modp_2048());
        assert_eq!(built.group().hash_to_group(), HashToGroup::CofactorClearing);
        assert_eq!(built.paillier_bits(), 2048);
        assert_eq!(built.primality_rounds(), 20);
        assert_eq!(built.max_nonce_attempts(), 128);
        assert!(!built.allows_insecure_sizes());
        Ok(())
    }

    #[test]
    fn insecure_sizes_require_opt_in() -> Result<(), Box<dyn StdError>> {
        let e = ProtocolParametersBuilder::new()
            .set_group(DdhGroup::modp_1536())
            .build();
        assert_eq!(
            e,
            Err(Error::ParametersError(ParametersError::InsecureGroupSize(
                1536, 2048
            )))
        );

        let e = ProtocolParametersBuilder::new()
            .set_paillier_bits(1024)
            .build();
        assert_eq!(
            e,
            Err(Error::ParametersError(
                ParametersError::InsecurePaillierSize(1024, 2048)
            ))
        );

        let par = ProtocolParametersBuilder::new()
            .set_group(DdhGroup::modp_1536())
            .set_paillier_bits(512)
            .allow_insecure_sizes()
            .build()?;
        assert_eq!(par.paillier_bits(), 512);
        assert_eq!(par.group().modulus_bits(), 1536);
        assert!(par.allows_insecure_sizes());
        Ok(())
    }

    #[test]
    fn invalid_parameters() {
        for bits in [0, 8, 15, 2049] {
            assert_eq!(
                ProtocolParametersBuilder::new()
                    .set_paillier_bits(bits)
                    .allow_insecure_sizes()
                    .build(),
                Err(Error::ParametersError(
                    ParametersError::InvalidPaillierSize(bits)
                ))
            );
        }

        // Primality rounds are checked even for insecure sizes.
        assert_eq!(
            ProtocolParametersBuilder::new()
                .set_primality_rounds(19)
                .allow_insecure_sizes()
                .build(),
            Err(Error::ParametersError(
                ParametersError::InvalidPrimalityRounds(19, 20)
            ))
        );

        assert_eq!(
            ProtocolParametersBuilder::new()
                .set_max_nonce_attempts(0)
                .build(),
            Err(Error::ParametersError(
                ParametersError::InvalidNonceAttempts
            ))
        );
    }

    #[test]
    fn hash_to_group_selection() -> Result<(), Box<dyn StdError>> {
        let par = ProtocolParametersBuilder::new()
            .set_hash_to_group(HashToGroup::GeneratorExponent)
            .build()?;
        assert_eq!(par.group().hash_to_group(), HashToGroup::GeneratorExponent);

        // The mode carried by a group is kept unless overridden afterwards.
        let par = ProtocolParametersBuilder::new()
            .set_group(DdhGroup::modp_2048().with_hash_to_group(HashToGroup::GeneratorExponent))
            .build()?;
        assert_eq!(par.group().hash_to_group(), HashToGroup::GeneratorExponent);
        Ok(())
    }
}
