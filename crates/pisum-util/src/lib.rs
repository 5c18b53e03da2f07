#![crate_name = "pisum_util"]
#![crate_type = "lib"]
#![warn(missing_docs, unused_imports)]

//! Utilities for the pisum library: primality, sampling, shuffling and
//! fixed-width integer encodings.

use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::{One, Zero};
use rand::{seq::SliceRandom, CryptoRng, RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Number of Miller-Rabin rounds used when the caller does not specify one.
/// Twenty rounds bound the error probability by 2^-40.
pub const DEFAULT_PRIMALITY_ROUNDS: usize = 20;

/// Returns whether `n` is probably prime after `rounds` Miller-Rabin rounds
/// followed by a Baillie-PSW test.
pub fn is_probable_prime(n: &BigUint, rounds: usize) -> bool {
    if n < &BigUint::from(2u8) {
        return false;
    }
    let candidate = num_bigint_dig::BigUint::from_bytes_be(&n.to_bytes_be());
    num_bigint_dig::prime::probably_prime(&candidate, rounds)
}

/// Sample a probable prime of exactly `bits` bits whose two most significant
/// bits are set, so that the product of two such primes has exactly
/// `2 * bits` bits.
///
/// Returns `None` if `bits < 3` or if no prime was found after `100 * bits`
/// candidates.
pub fn generate_prime<R: RngCore + CryptoRng>(
    bits: u64,
    rounds: usize,
    rng: &mut R,
) -> Option<BigUint> {
    if bits < 3 {
        return None;
    }
    let mask = (BigUint::one() << (bits - 1)) | (BigUint::one() << (bits - 2)) | BigUint::one();
    for _ in 0..100 * bits {
        let mut candidate = rng.gen_biguint(bits);
        candidate |= &mask;
        if is_probable_prime(&candidate, rounds) {
            return Some(candidate);
        }
    }
    None
}

/// Sample an integer uniformly in `[1, n)` that is coprime to `n`, trying at
/// most `max_attempts` candidates.
pub fn sample_coprime<R: RngCore + CryptoRng>(
    n: &BigUint,
    max_attempts: usize,
    rng: &mut R,
) -> Option<BigUint> {
    if n <= &BigUint::one() {
        return None;
    }
    (0..max_attempts)
        .map(|_| rng.gen_biguint_range(&BigUint::one(), n))
        .find(|r| r.gcd(n).is_one())
}

/// Sample an integer uniformly in `[low, high)`.
///
/// Returns `None` when the range is empty.
pub fn sample_range<R: RngCore + CryptoRng>(
    low: &BigUint,
    high: &BigUint,
    rng: &mut R,
) -> Option<BigUint> {
    if low >= high {
        return None;
    }
    Some(rng.gen_biguint_range(low, high))
}

/// Shuffle `items` in place with a Fisher-Yates shuffle driven by a
/// cryptographically secure generator.
///
/// The shuffle is sequential; callers must only invoke it once every element
/// of `items` has been computed.
pub fn shuffle<T, R: RngCore + CryptoRng>(items: &mut [T], rng: &mut R) {
    items.shuffle(rng);
}

/// Derive `count` independent ChaCha20 generators, each seeded with 32 bytes
/// drawn sequentially from `rng`.
///
/// This lets per-element work that needs randomness run in parallel while all
/// entropy still originates from the caller's generator.
pub fn fork_rngs<R: RngCore + CryptoRng>(count: usize, rng: &mut R) -> Vec<ChaCha20Rng> {
    (0..count)
        .map(|_| {
            let mut seed = <ChaCha20Rng as SeedableRng>::Seed::default();
            rng.fill_bytes(&mut seed);
            ChaCha20Rng::from_seed(seed)
        })
        .collect()
}

/// Number of bytes needed to hold an integer of `bits` bits.
pub const fn byte_len(bits: u64) -> usize {
    bits.div_ceil(8) as usize
}

/// Encode `x` as a big-endian byte string of exactly `len` bytes.
///
/// Returns `None` if `x` does not fit.
pub fn to_fixed_be(x: &BigUint, len: usize) -> Option<Vec<u8>> {
    if x.is_zero() {
        return Some(vec![0u8; len]);
    }
    let bytes = x.to_bytes_be();
    if bytes.len() > len {
        return None;
    }
    let mut out = vec![0u8; len - bytes.len()];
    out.extend_from_slice(&bytes);
    Some(out)
}

/// Decode a big-endian byte string that must be exactly `len` bytes long.
pub fn from_fixed_be(bytes: &[u8], len: usize) -> Option<BigUint> {
    if bytes.len() != len {
        return None;
    }
    Some(BigUint::from_bytes_be(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::thread_rng;

    #[test]
    fn probable_prime_small_values() {
        assert!(!is_probable_prime(&BigUint::zero(), 20));
        assert!(!is_probable_prime(&BigUint::one(), 20));
        assert!(is_probable_prime(&BigUint::from(2u8), 20));
        assert!(is_probable_prime(&BigUint::from(3u8), 20));
        assert!(!is_probable_prime(&BigUint::from(4u8), 20));
        // Carmichael numbers fool the Fermat test but not Miller-Rabin.
        assert!(!is_probable_prime(&BigUint::from(561u32), 20));
        assert!(!is_probable_prime(&BigUint::from(41041u32), 20));
    }

    #[test]
    fn probable_prime_mersenne() {
        let m127 = (BigUint::one() << 127u32) - BigUint::one();
        assert!(is_probable_prime(&m127, 20));
        let m128 = (BigUint::one() << 128u32) - BigUint::one();
        assert!(!is_probable_prime(&m128, 20));
    }

    #[test]
    fn generate_prime_has_requested_size() {
        let mut rng = thread_rng();
        for bits in [3u64, 16, 64, 128, 256] {
            let p = generate_prime(bits, DEFAULT_PRIMALITY_ROUNDS, &mut rng).unwrap();
            assert_eq!(p.bits(), bits);
            assert!(is_probable_prime(&p, DEFAULT_PRIMALITY_ROUNDS));
        }
        assert!(generate_prime(2, DEFAULT_PRIMALITY_ROUNDS, &mut rng).is_none());
    }

    #[test]
    fn product_of_generated_primes_has_double_size() {
        let mut rng = thread_rng();
        let p = generate_prime(128, DEFAULT_PRIMALITY_ROUNDS, &mut rng).unwrap();
        let q = generate_prime(128, DEFAULT_PRIMALITY_ROUNDS, &mut rng).unwrap();
        assert_eq!((p * q).bits(), 256);
    }

    #[test]
    fn sample_coprime_is_coprime() {
        let mut rng = thread_rng();
        let n = BigUint::from(3u32 * 5 * 7 * 11 * 13);
        for _ in 0..100 {
            let r = sample_coprime(&n, 64, &mut rng).unwrap();
            assert!(r >= BigUint::one() && r < n);
            assert!(r.gcd(&n).is_one());
        }
        assert!(sample_coprime(&BigUint::one(), 64, &mut rng).is_none());
        assert!(sample_coprime(&n, 0, &mut rng).is_none());
    }

    #[test]
    fn sample_range_bounds() {
        let mut rng = thread_rng();
        let low = BigUint::from(10u8);
        let high = BigUint::from(12u8);
        for _ in 0..50 {
            let x = sample_range(&low, &high, &mut rng).unwrap();
            assert!(x >= low && x < high);
        }
        assert!(sample_range(&high, &low, &mut rng).is_none());
    }

    #[test]
    fn shuffle_preserves_elements() {
        let mut rng = thread_rng();
        let original: Vec<u32> = (0..64).collect();
        let mut shuffled = original.clone();
        shuffle(&mut shuffled, &mut rng);
        assert_ne!(shuffled, original);
        shuffled.sort_unstable();
        assert_eq!(shuffled, original);
    }

    #[test]
    fn forked_rngs_are_independent() {
        let mut rng = thread_rng();
        let mut rngs = fork_rngs(2, &mut rng);
        assert_eq!(rngs.len(), 2);
        let a = rngs[0].next_u64();
        let b = rngs[1].next_u64();
        assert_ne!(a, b);
    }

    #[test]
    fn fixed_width_encoding() {
        assert_eq!(byte_len(0), 0);
        assert_eq!(byte_len(1), 1);
        assert_eq!(byte_len(8), 1);
        assert_eq!(byte_len(2048), 256);
        assert_eq!(byte_len(2049), 257);

        let x = BigUint::from(0x0102u32);
        assert_eq!(to_fixed_be(&x, 4).unwrap(), vec![0, 0, 1, 2]);
        assert_eq!(to_fixed_be(&BigUint::zero(), 2).unwrap(), vec![0, 0]);
        assert!(to_fixed_be(&x, 1).is_none());
        assert_eq!(from_fixed_be(&[0, 0, 1, 2], 4).unwrap(), x);
        assert!(from_fixed_be(&[1, 2], 4).is_none());
    }

    proptest! {
        #[test]
        fn fixed_width_roundtrip(value in any::<u128>(), extra in 0usize..8) {
            let x = BigUint::from(value);
            let len = 16 + extra;
            let bytes = to_fixed_be(&x, len).unwrap();
            prop_assert_eq!(bytes.len(), len);
            prop_assert_eq!(from_fixed_be(&bytes, len).unwrap(), x);
        }
    }
}
