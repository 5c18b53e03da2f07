use super::element::{GroupElement, Scalar};
use super::hash::{digest, expand, HashToGroup, EXPANSION_MARGIN_BITS};
use crate::{Error, Result};
use num_bigint::BigUint;
use num_integer::Integer;
use num_traits::{One, Zero};
use pisum_util::{
    byte_len, from_fixed_be, is_probable_prime, sample_range, to_fixed_be,
    DEFAULT_PRIMALITY_ROUNDS,
};
use rand::{CryptoRng, RngCore};

/// RFC 3526, group 14: 2048-bit MODP group, generator 2.
const MODP_2048_P: &str = "\
    FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD1\
    29024E088A67CC74020BBEA63B139B22514A08798E3404DD\
    EF9519B3CD3A431B302B0A6DF25F14374FE1356D6D51C245\
    E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
    EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3D\
    C2007CB8A163BF0598DA48361C55D39A69163FA8FD24CF5F\
    83655D23DCA3AD961C62F356208552BB9ED529077096966D\
    670C354E4ABC9804F1746C08CA18217C32905E462E36CE3B\
    E39E772C180E86039B2783A2EC07A28FB5C55DF06F4C52C9\
    DE2BCBF6955817183995497CEA956AE515D2261898FA0510\
    15728E5A8AACAA68FFFFFFFFFFFFFFFF";

/// RFC 3526, group 5: 1536-bit MODP group, generator 2.
const MODP_1536_P: &str = "\
    FFFFFFFFFFFFFFFFC90FDAA22168C234C4C6628B80DC1CD1\
    29024E088A67CC74020BBEA63B139B22514A08798E3404DD\
    EF9519B3CD3A431B302B0A6DF25F14374FE1356D6D51C245\
    E485B576625E7EC6F44C42E9A637ED6B0BFF5CB6F406B7ED\
    EE386BFB5A899FA5AE9F24117C4B1FE649286651ECE45B3D\
    C2007CB8A163BF0598DA48361C55D39A69163FA8FD24CF5F\
    83655D23DCA3AD961C62F356208552BB9ED529077096966D\
    670C354E4ABC9804F1746C08CA237327FFFFFFFFFFFFFFFF";

/// Maximum number of counters tried by [`HashToGroup::CofactorClearing`].
const MAX_HASH_ATTEMPTS: u32 = 256;

/// A cyclic subgroup of prime order `q` of the multiplicative group modulo a
/// prime `p`, generated by `g`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DdhGroup {
    p: BigUint,
    q: BigUint,
    g: BigUint,
    cofactor: BigUint,
    hash_to_group: HashToGroup,
}

impl DdhGroup {
    /// Create a group from its modulus `p`, its order `q` and a generator
    /// `g`, checking that `p` and `q` are prime, that `q` divides `p - 1`,
    /// and that `g` generates the subgroup of order `q`.
    pub fn new(p: BigUint, q: BigUint, g: BigUint) -> Result<Self> {
        Self::new_with_rounds(p, q, g, DEFAULT_PRIMALITY_ROUNDS)
    }

    /// Same as [`DdhGroup::new`], with an explicit number of primality
    /// testing rounds.
    pub fn new_with_rounds(p: BigUint, q: BigUint, g: BigUint, rounds: usize) -> Result<Self> {
        if !is_probable_prime(&p, rounds) {
            return Err(Error::InvalidGroupParameter(
                "The modulus p is not prime".to_string(),
            ));
        }
        if !is_probable_prime(&q, rounds) {
            return Err(Error::InvalidGroupParameter(
                "The order q is not prime".to_string(),
            ));
        }
        let (cofactor, remainder) = (&p - 1u32).div_rem(&q);
        if !remainder.is_zero() {
            return Err(Error::InvalidGroupParameter(
                "The order q does not divide p - 1".to_string(),
            ));
        }
        if g <= BigUint::one() || g >= p {
            return Err(Error::InvalidGroupParameter(
                "The generator g must lie in (1, p)".to_string(),
            ));
        }
        if !g.modpow(&q, &p).is_one() {
            return Err(Error::InvalidGroupParameter(
                "The generator g does not have order q".to_string(),
            ));
        }
        Ok(Self {
            p,
            q,
            g,
            cofactor,
            hash_to_group: HashToGroup::default(),
        })
    }

    /// The 2048-bit MODP group of RFC 3526 (group 14) with generator 2.
    pub fn modp_2048() -> Self {
        Self::from_safe_prime(MODP_2048_P)
    }

    /// The 1536-bit MODP group of RFC 3526 (group 5) with generator 2.
    ///
    /// This group is too small for production use and is meant for tests.
    pub fn modp_1536() -> Self {
        Self::from_safe_prime(MODP_1536_P)
    }

    /// Build a group from a trusted hexadecimal safe prime, with `q = (p - 1) / 2`
    /// and generator `2`.
    fn from_safe_prime(hex: &str) -> Self {
        let p = BigUint::parse_bytes(hex.as_bytes(), 16).unwrap_or_default();
        let q = (&p - 1u32) >> 1u32;
        Self {
            p,
            q,
            g: BigUint::from(2u32),
            cofactor: BigUint::from(2u32),
            hash_to_group: HashToGroup::default(),
        }
    }

    /// Select how identifiers are mapped to group elements.
    pub fn with_hash_to_group(mut self, hash_to_group: HashToGroup) -> Self {
        self.hash_to_group = hash_to_group;
        self
    }

    /// Returns the modulus `p`.
    pub fn p(&self) -> &BigUint {
        &self.p
    }

    /// Returns the order `q` of the subgroup.
    pub fn q(&self) -> &BigUint {
        &self.q
    }

    /// Returns the generator `g`.
    pub fn g(&self) -> &BigUint {
        &self.g
    }

    /// Returns the hash-to-group map in use.
    pub const fn hash_to_group(&self) -> HashToGroup {
        self.hash_to_group
    }

    /// Returns the size of the modulus in bits.
    pub fn modulus_bits(&self) -> u64 {
        self.p.bits()
    }

    /// Returns the size in bytes of an encoded element.
    pub fn element_byte_len(&self) -> usize {
        byte_len(self.p.bits())
    }

    /// Returns whether `x` is an element of the subgroup of order `q`.
    pub fn contains(&self, x: &BigUint) -> bool {
        !x.is_zero() && x < &self.p && x.modpow(&self.q, &self.p).is_one()
    }

    /// Convert an integer into a group element, checking membership.
    pub fn element(&self, x: BigUint) -> Result<GroupElement> {
        if self.contains(&x) {
            Ok(GroupElement(x))
        } else {
            Err(Error::NotInGroup)
        }
    }

    /// Convert an integer into a scalar, reducing it modulo `q`. A value
    /// that is zero modulo `q` is rejected.
    pub fn scalar(&self, value: &BigUint) -> Result<Scalar> {
        let reduced = value % &self.q;
        if reduced.is_zero() {
            return Err(Error::InvalidExponent(
                "The exponent is zero modulo the group order".to_string(),
            ));
        }
        Ok(Scalar::from_biguint(&reduced))
    }

    /// Sample a scalar uniformly in `[1, q - 1]`.
    pub fn random_scalar<R: RngCore + CryptoRng>(&self, rng: &mut R) -> Scalar {
        // q is prime, so [1, q) is never empty.
        let value = sample_range(&BigUint::one(), &self.q, rng).unwrap_or_else(BigUint::one);
        Scalar::from_biguint(&value)
    }

    /// Compute `element^exponent mod p`, with the exponent first reduced
    /// modulo `q`. An exponent that reduces to zero is rejected rather than
    /// mapping the element to the identity.
    pub fn power(&self, element: &GroupElement, exponent: &Scalar) -> Result<GroupElement> {
        let e = exponent.to_biguint() % &self.q;
        if e.is_zero() {
            return Err(Error::InvalidExponent(
                "The exponent is zero modulo the group order".to_string(),
            ));
        }
        Ok(GroupElement(element.0.modpow(&e, &self.p)))
    }

    /// Deterministically map an identifier to a non-identity element of the
    /// subgroup of order `q`.
    pub fn hash_to_element(&self, identifier: &[u8]) -> Result<GroupElement> {
        match self.hash_to_group {
            HashToGroup::CofactorClearing => {
                let out_bits = self.p.bits() + EXPANSION_MARGIN_BITS;
                for counter in 0..MAX_HASH_ATTEMPTS {
                    let x = expand(identifier, counter, out_bits) % &self.p;
                    let h = x.modpow(&self.cofactor, &self.p);
                    if h > BigUint::one() {
                        return Ok(GroupElement(h));
                    }
                }
                Err(Error::HashToGroupFailure(MAX_HASH_ATTEMPTS))
            }
            HashToGroup::GeneratorExponent => {
                let mut exponent = digest(identifier) % &self.q;
                if exponent.is_zero() {
                    exponent = BigUint::one();
                }
                Ok(GroupElement(self.g.modpow(&exponent, &self.p)))
            }
        }
    }

    /// Encode an element as a big-endian integer of
    /// [`element_byte_len`](Self::element_byte_len) bytes.
    pub fn element_to_bytes(&self, element: &GroupElement) -> Vec<u8> {
        to_fixed_be(&element.0, self.element_byte_len()).unwrap_or_else(|| element.0.to_bytes_be())
    }

    /// Decode an element, checking its width and its membership.
    pub fn element_from_bytes(&self, bytes: &[u8]) -> Result<GroupElement> {
        let len = self.element_byte_len();
        let x = from_fixed_be(bytes, len).ok_or(Error::InvalidEncoding(len, bytes.len()))?;
        self.element(x)
    }
}
