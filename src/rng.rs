//! # Secure Random Number Generation
//!
//! All randomness in the crate flows through this module: salts, cipher
//! IVs, padding fill, and password generation. Callers pick a
//! [`RandomQuality`] tier; both cryptographic tiers map to the OS CSPRNG,
//! while [`RandomQuality::Weak`] maps to a fast non-cryptographic PRNG and
//! exists for generating bulk test data only.
//!
//! Ranged sampling is unbiased: [`random_u64_in`] uses rejection sampling
//! rather than modulo reduction.

use rand::rngs::{OsRng, SmallRng};
use rand::{RngCore, SeedableRng};

use crate::error::CryptoError;

/// How strong the requested random bytes need to be.
///
/// `Strong` is the default for salts and password generation; `VeryStrong`
/// is reserved for long-term key material and the encryption pipeline's
/// IVs. Both are OS-seeded CSPRNG output; the distinction preserves the
/// caller's intent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RandomQuality {
    /// Non-cryptographic; test data only.
    Weak,
    /// Session-level secrets: salts, generated passwords.
    Strong,
    /// Long-term key material and encryption IVs.
    VeryStrong,
}

/// Fill a fresh buffer of `length` bytes with randomness of the given
/// quality.
pub fn random_bytes(length: usize, quality: RandomQuality) -> Result<Vec<u8>, CryptoError> {
    let mut bytes = vec![0u8; length];
    fill_random(&mut bytes, quality)?;
    Ok(bytes)
}

/// Generate a fresh key-derivation salt of `length` bytes.
pub fn generate_salt(length: usize) -> Result<Vec<u8>, CryptoError> {
    random_bytes(length, RandomQuality::Strong)
}

fn fill_random(buf: &mut [u8], quality: RandomQuality) -> Result<(), CryptoError> {
    match quality {
        RandomQuality::Weak => {
            SmallRng::from_entropy().fill_bytes(buf);
            Ok(())
        }
        RandomQuality::Strong | RandomQuality::VeryStrong => OsRng
            .try_fill_bytes(buf)
            .map_err(|e| CryptoError::Rng(e.to_string())),
    }
}

fn next_u64(quality: RandomQuality) -> Result<u64, CryptoError> {
    let mut bytes = [0u8; 8];
    fill_random(&mut bytes, quality)?;
    Ok(u64::from_le_bytes(bytes))
}

/// Sample a uniformly distributed integer from the inclusive range
/// `[min, max]`.
///
/// Sampling rejects raw draws that would land in the truncated tail of the
/// 64-bit space, so every value in the range is exactly equally likely.
pub fn random_u64_in(min: u64, max: u64, quality: RandomQuality) -> Result<u64, CryptoError> {
    if min > max {
        return Err(CryptoError::Rng(format!(
            "invalid sampling range [{}, {}]",
            min, max
        )));
    }

    let span = max - min;
    if span == u64::MAX {
        return next_u64(quality);
    }
    let range = span + 1;

    // Largest draw we can accept while keeping every residue class equally
    // represented.
    let cutoff = u64::MAX - ((u64::MAX % range) + 1) % range;
    loop {
        let draw = next_u64(quality)?;
        if draw <= cutoff {
            return Ok(min + draw % range);
        }
    }
}
