//! # Block Padding
//!
//! The encryption pipeline works on whole cipher blocks, but stored secrets
//! have arbitrary lengths. Before encryption the plaintext is prefixed with
//! its own length as a little-endian 64-bit integer and then extended with
//! random bytes up to the next multiple of the block size; after decryption
//! the prefix says exactly how much of the buffer is real.
//!
//! Random fill (rather than a deterministic scheme) means the padding bytes
//! reveal nothing about the plaintext length beyond the block count.

use crate::error::CryptoError;
use crate::rng::{self, RandomQuality};

const LENGTH_PREFIX_SIZE: usize = 8;

/// Pad `data` out to a positive multiple of `block_size`.
///
/// The result is always at least [`LENGTH_PREFIX_SIZE`] bytes long, and its
/// length is always an exact multiple of `block_size`.
pub fn pad(data: &[u8], block_size: usize) -> Result<Vec<u8>, CryptoError> {
    if block_size == 0 {
        return Err(CryptoError::Cipher("invalid block size 0".to_string()));
    }

    let mut padded = Vec::with_capacity(data.len() + LENGTH_PREFIX_SIZE + block_size);
    padded.extend_from_slice(&(data.len() as u64).to_le_bytes());
    padded.extend_from_slice(data);

    let remainder = padded.len() % block_size;
    if remainder != 0 {
        let fill = rng::random_bytes(block_size - remainder, RandomQuality::Strong)?;
        padded.extend_from_slice(&fill);
    }
    Ok(padded)
}

/// Recover the original byte string from a padded buffer.
pub fn unpad(mut padded: Vec<u8>) -> Result<Vec<u8>, CryptoError> {
    if padded.len() < LENGTH_PREFIX_SIZE {
        return Err(CryptoError::Corrupt);
    }

    let mut prefix = [0u8; LENGTH_PREFIX_SIZE];
    prefix.copy_from_slice(&padded[..LENGTH_PREFIX_SIZE]);
    let length = u64::from_le_bytes(prefix);

    if length > (padded.len() - LENGTH_PREFIX_SIZE) as u64 {
        return Err(CryptoError::Corrupt);
    }

    padded.drain(..LENGTH_PREFIX_SIZE);
    padded.truncate(length as usize);
    Ok(padded)
}
