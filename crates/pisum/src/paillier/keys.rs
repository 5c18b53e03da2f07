//! Keys for the Paillier encryption scheme

use super::Ciphertext;
use crate::parameters::DEFAULT_MAX_NONCE_ATTEMPTS;
use crate::{Error, ProtocolParameters, Result};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use pisum_traits::{AheDecrypter, AheEncrypter, AheParameters};
use pisum_util::{byte_len, generate_prime, sample_coprime};
use rand::{CryptoRng, RngCore};
use std::sync::Arc;
use tracing::debug;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// Number of prime pairs drawn before key generation gives up.
const MAX_KEYGEN_ATTEMPTS: usize = 16;

/// The public modulus `n` and its square.
#[derive(Debug, PartialEq, Eq, Hash)]
pub(crate) struct Modulus {
    pub(crate) n: BigUint,
    pub(crate) n_squared: BigUint,
}

impl Modulus {
    fn new(n: BigUint) -> Self {
        let n_squared = &n * &n;
        Self { n, n_squared }
    }

    /// `L(x) = (x - 1) / n`, or `None` when `x` is zero.
    fn l(&self, x: &BigUint) -> Option<BigUint> {
        if x.is_zero() {
            None
        } else {
            Some((x - 1u32) / &self.n)
        }
    }
}

/// Public key of the Paillier encryption scheme, with generator `g = n + 1`.
#[derive(Debug, Clone)]
pub struct EncryptionKey {
    pub(crate) modulus: Arc<Modulus>,
    max_nonce_attempts: usize,
}

impl PartialEq for EncryptionKey {
    fn eq(&self, other: &Self) -> bool {
        self.modulus == other.modulus
    }
}

impl Eq for EncryptionKey {}

impl AheParameters for EncryptionKey {}

impl EncryptionKey {
    /// Create an encryption key from its modulus `n`.
    ///
    /// Returns an error if `n` is even or smaller than 16 bits, or if
    /// `max_nonce_attempts` is zero.
    pub fn new(n: BigUint, max_nonce_attempts: usize) -> Result<Self> {
        if n.bits() < 16 || n.is_even() {
            return Err(Error::UnspecifiedInput(
                "The Paillier modulus must be odd and of at least 16 bits".to_string(),
            ));
        }
        if max_nonce_attempts == 0 {
            return Err(Error::ParametersError(
                crate::ParametersError::InvalidNonceAttempts,
            ));
        }
        Ok(Self {
            modulus: Arc::new(Modulus::new(n)),
            max_nonce_attempts,
        })
    }

    /// Returns the modulus `n`.
    pub fn n(&self) -> &BigUint {
        &self.modulus.n
    }

    /// Returns `n^2`.
    pub fn n_squared(&self) -> &BigUint {
        &self.modulus.n_squared
    }

    /// Returns the size of `n` in bits.
    pub fn bits(&self) -> usize {
        self.modulus.n.bits() as usize
    }

    /// Returns the bound on encryption randomness sampling.
    pub const fn max_nonce_attempts(&self) -> usize {
        self.max_nonce_attempts
    }

    /// Returns the size in bytes of an encoded ciphertext.
    pub fn ciphertext_byte_len(&self) -> usize {
        byte_len(self.modulus.n_squared.bits())
    }

    /// Returns whether `ct` was produced under this key.
    pub fn owns(&self, ct: &Ciphertext) -> bool {
        Arc::ptr_eq(&self.modulus, &ct.modulus) || self.modulus == ct.modulus
    }

    /// Generate a fresh encryption of zero.
    pub fn encrypt_zero<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Result<Ciphertext> {
        self.try_encrypt(&BigUint::zero(), rng)
    }

    /// Homomorphically add two ciphertexts: the result decrypts to the sum of
    /// the plaintexts modulo `n`.
    pub fn add(&self, c1: &Ciphertext, c2: &Ciphertext) -> Result<Ciphertext> {
        if !self.owns(c1) || !self.owns(c2) {
            return Err(Error::MismatchedKeys);
        }
        Ok(Ciphertext {
            value: (&c1.value * &c2.value) % &self.modulus.n_squared,
            modulus: self.modulus.clone(),
        })
    }
}

impl AheEncrypter<BigUint, Ciphertext> for EncryptionKey {
    type Error = Error;

    fn try_encrypt<R: RngCore + CryptoRng>(&self, pt: &BigUint, rng: &mut R) -> Result<Ciphertext> {
        let Modulus { n, n_squared } = self.modulus.as_ref();
        if pt >= n {
            return Err(Error::PlaintextOutOfRange);
        }
        let r = sample_coprime(n, self.max_nonce_attempts, rng)
            .ok_or(Error::EncryptionFailure(self.max_nonce_attempts))?;

        // (n + 1)^m = 1 + m * n mod n^2
        let gm = (BigUint::one() + pt * n) % n_squared;
        let rn = r.modpow(n, n_squared);
        Ok(Ciphertext {
            value: (gm * rn) % n_squared,
            modulus: self.modulus.clone(),
        })
    }
}

/// Private key of the Paillier encryption scheme.
///
/// `λ` and `μ` are stored as byte buffers wiped on drop. Decryption rebuilds
/// them as `BigUint` temporaries, which are not wiped.
#[derive(Clone)]
pub struct DecryptionKey {
    modulus: Arc<Modulus>,
    lambda: Zeroizing<Vec<u8>>,
    mu: Zeroizing<Vec<u8>>,
}

impl Zeroize for DecryptionKey {
    fn zeroize(&mut self) {
        self.lambda.zeroize();
        self.mu.zeroize();
    }
}

impl ZeroizeOnDrop for DecryptionKey {}

impl std::fmt::Debug for DecryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecryptionKey")
            .field("n", &self.modulus.n)
            .finish_non_exhaustive()
    }
}

impl DecryptionKey {
    /// Returns whether this key decrypts ciphertexts under `ek`.
    pub fn matches(&self, ek: &EncryptionKey) -> bool {
        self.modulus == ek.modulus
    }
}

impl AheDecrypter<BigUint, Ciphertext> for DecryptionKey {
    type Error = Error;

    fn try_decrypt(&self, ct: &Ciphertext) -> Result<BigUint> {
        if !Arc::ptr_eq(&self.modulus, &ct.modulus) && self.modulus != ct.modulus {
            return Err(Error::MismatchedKeys);
        }
        let Modulus { n, n_squared } = self.modulus.as_ref();
        if &ct.value >= n_squared {
            return Err(Error::DecryptionRangeError);
        }
        let lambda = BigUint::from_bytes_be(&self.lambda);
        let mu = BigUint::from_bytes_be(&self.mu);
        let x = ct.value.modpow(&lambda, n_squared);
        let l = self.modulus.l(&x).ok_or(Error::DecryptionRangeError)?;
        Ok((l * mu) % n)
    }
}

/// A Paillier key pair.
#[derive(Debug, Clone)]
pub struct KeyPair {
    ek: Arc<EncryptionKey>,
    dk: DecryptionKey,
}

impl KeyPair {
    /// Generate a key pair whose modulus has exactly `bits` bits, testing the
    /// primality of the factors with `primality_rounds` Miller-Rabin rounds.
    ///
    /// Returns an error if `bits` is odd or smaller than 16.
    pub fn generate<R: RngCore + CryptoRng>(
        bits: usize,
        primality_rounds: usize,
        rng: &mut R,
    ) -> Result<Self> {
        Self::generate_with_attempts(bits, primality_rounds, DEFAULT_MAX_NONCE_ATTEMPTS, rng)
    }

    /// Generate a key pair as configured by the protocol parameters.
    pub fn from_parameters<R: RngCore + CryptoRng>(
        par: &ProtocolParameters,
        rng: &mut R,
    ) -> Result<Self> {
        Self::generate_with_attempts(
            par.paillier_bits(),
            par.primality_rounds(),
            par.max_nonce_attempts(),
            rng,
        )
    }

    fn generate_with_attempts<R: RngCore + CryptoRng>(
        bits: usize,
        primality_rounds: usize,
        max_nonce_attempts: usize,
        rng: &mut R,
    ) -> Result<Self> {
        if bits < 16 || bits % 2 == 1 {
            return Err(Error::KeyGenerationError(format!(
                "The modulus size must be even and at least 16, found {bits}"
            )));
        }
        let half = (bits / 2) as u64;
        for _ in 0..MAX_KEYGEN_ATTEMPTS {
            let p = generate_prime(half, primality_rounds, rng)
                .ok_or_else(|| Error::KeyGenerationError("No prime found".to_string()))?;
            let q = generate_prime(half, primality_rounds, rng)
                .ok_or_else(|| Error::KeyGenerationError("No prime found".to_string()))?;
            if p == q {
                continue;
            }

            let n = &p * &q;
            let (p1, q1) = (&p - 1u32, &q - 1u32);
            if !n.gcd(&(&p1 * &q1)).is_one() || n.bits() as usize != bits {
                continue;
            }

            let modulus = Arc::new(Modulus::new(n));
            let lambda = p1.lcm(&q1);
            let g = &modulus.n + 1u32;
            let x = g.modpow(&lambda, &modulus.n_squared);
            let Some(mu) = modulus.l(&x).and_then(|l| l.modinv(&modulus.n)) else {
                continue;
            };

            debug!(bits, "Generated Paillier key pair");
            let ek = Arc::new(EncryptionKey {
                modulus: modulus.clone(),
                max_nonce_attempts,
            });
            let dk = DecryptionKey {
                modulus,
                lambda: Zeroizing::new(lambda.to_bytes_be()),
                mu: Zeroizing::new(mu.to_bytes_be()),
            };
            return Ok(Self { ek, dk });
        }
        Err(Error::KeyGenerationError(format!(
            "No suitable primes after {MAX_KEYGEN_ATTEMPTS} attempts"
        )))
    }

    /// Returns the public key.
    pub fn encryption_key(&self) -> &Arc<EncryptionKey> {
        &self.ek
    }

    /// Returns the private key.
    pub fn decryption_key(&self) -> &DecryptionKey {
        &self.dk
    }
}

#[cfg(test)]
mod tests {
    use super::{EncryptionKey, KeyPair};
    use crate::Error;
    use num_bigint::BigUint;
    use pisum_traits::{AheDecrypter, AheEncrypter};
    use rand::thread_rng;
    use std::error::Error as StdError;
    use zeroize::Zeroize;

    #[test]
    fn generate_has_requested_size() -> Result<(), Box<dyn StdError>> {
        let mut rng = thread_rng();
        for bits in [16, 64, 256, 512] {
            let keys = KeyPair::generate(bits, 20, &mut rng)?;
            assert_eq!(keys.encryption_key().bits(), bits);
            assert!(keys.decryption_key().matches(keys.encryption_key()));
        }
        Ok(())
    }

    #[test]
    fn generate_rejects_invalid_sizes() {
        let mut rng = thread_rng();
        for bits in [0, 8, 14, 17, 513] {
            assert!(matches!(
                KeyPair::generate(bits, 20, &mut rng),
                Err(Error::KeyGenerationError(_))
            ));
        }
    }

    #[test]
    fn encrypt_decrypt() -> Result<(), Box<dyn StdError>> {
        let mut rng = thread_rng();
        let keys = KeyPair::generate(256, 20, &mut rng)?;
        let ek = keys.encryption_key();
        let dk = keys.decryption_key();
        let n_minus_one = ek.n() - 1u32;
        for m in [
            BigUint::from(0u32),
            BigUint::from(1u32),
            BigUint::from(u64::MAX),
            n_minus_one,
        ] {
            let ct = ek.try_encrypt(&m, &mut rng)?;
            assert!(ek.owns(&ct));
            assert_eq!(dk.try_decrypt(&ct)?, m);
        }
        Ok(())
    }

    #[test]
    fn encryption_is_randomized() -> Result<(), Box<dyn StdError>> {
        let mut rng = thread_rng();
        let keys = KeyPair::generate(256, 20, &mut rng)?;
        let ek = keys.encryption_key();
        let a = ek.encrypt_zero(&mut rng)?;
        let b = ek.encrypt_zero(&mut rng)?;
        assert_ne!(a, b);
        assert_eq!(keys.decryption_key().try_decrypt(&a)?, BigUint::from(0u32));
        Ok(())
    }

    #[test]
    fn plaintext_out_of_range() -> Result<(), Box<dyn StdError>> {
        let mut rng = thread_rng();
        let keys = KeyPair::generate(64, 20, &mut rng)?;
        let ek = keys.encryption_key();
        assert_eq!(
            ek.try_encrypt(ek.n(), &mut rng),
            Err(Error::PlaintextOutOfRange)
        );
        Ok(())
    }

    #[test]
    fn mismatched_keys() -> Result<(), Box<dyn StdError>> {
        let mut rng = thread_rng();
        let k1 = KeyPair::generate(128, 20, &mut rng)?;
        let k2 = KeyPair::generate(128, 20, &mut rng)?;
        let c1 = k1.encryption_key().try_encrypt(&BigUint::from(3u32), &mut rng)?;
        let c2 = k2.encryption_key().try_encrypt(&BigUint::from(4u32), &mut rng)?;
        assert!(!k1.decryption_key().matches(k2.encryption_key()));
        assert_eq!(
            k2.decryption_key().try_decrypt(&c1),
            Err(Error::MismatchedKeys)
        );
        assert_eq!(
            k1.encryption_key().add(&c1, &c2),
            Err(Error::MismatchedKeys)
        );
        Ok(())
    }

    #[test]
    fn encryption_key_from_modulus() -> Result<(), Box<dyn StdError>> {
        let mut rng = thread_rng();
        let keys = KeyPair::generate(128, 20, &mut rng)?;
        let ek = EncryptionKey::new(keys.encryption_key().n().clone(), 128)?;
        assert_eq!(&ek, keys.encryption_key().as_ref());

        // A ciphertext under the rebuilt key is decrypted by the original key.
        let ct = ek.try_encrypt(&BigUint::from(42u32), &mut rng)?;
        assert_eq!(keys.decryption_key().try_decrypt(&ct)?, BigUint::from(42u32));

        assert!(EncryptionKey::new(BigUint::from(65536u32), 128).is_err());
        assert!(EncryptionKey::new(BigUint::from(255u32), 128).is_err());
        assert!(EncryptionKey::new(ek.n().clone(), 0).is_err());
        Ok(())
    }

    #[test]
    fn nonce_sampling_is_bounded() -> Result<(), Box<dyn StdError>> {
        let mut rng = thread_rng();
        // Only about 38% of the residues are coprime to 3 * 5 * 7 * 11 * 13 * 17 * 19.
        let ek = EncryptionKey::new(BigUint::from(4849845u32), 1)?;
        let failures = (0..64)
            .map(|_| ek.try_encrypt(&BigUint::from(1u32), &mut rng))
            .filter(|r| r == &Err(Error::EncryptionFailure(1)))
            .count();
        assert!(failures > 0);
        Ok(())
    }

    #[test]
    fn zeroize_clears_private_values() -> Result<(), Box<dyn StdError>> {
        let mut rng = thread_rng();
        let keys = KeyPair::generate(64, 20, &mut rng)?;
        let mut dk = keys.decryption_key().clone();
        assert!(!dk.lambda.is_empty() && !dk.mu.is_empty());
        dk.zeroize();
        assert!(dk.lambda.is_empty());
        assert!(dk.mu.is_empty());
        Ok(())
    }

    #[test]
    fn debug_hides_private_values() -> Result<(), Box<dyn StdError>> {
        let mut rng = thread_rng();
        let keys = KeyPair::generate(64, 20, &mut rng)?;
        let s = format!("{:?}", keys.decryption_key());
        assert!(!s.contains("lambda"));
        assert!(!s.contains("mu"));
        Ok(())
    }
}
