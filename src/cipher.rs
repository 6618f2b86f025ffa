//! # Encryption Pipeline
//!
//! Entries are encrypted twice: first with Serpent-256, then with AES-256,
//! both in CBC mode with the same derived master key and an independent
//! random IV per layer. The plaintext is padded once (see
//! [`crate::padding`]) before the inner layer; each layer appends its IV
//! after its ciphertext, so a stored blob is entirely self-contained:
//!
//! ```text
//! AES-256-CBC( Serpent-256-CBC(padded plaintext) || IV_serpent ) || IV_aes
//! ```
//!
//! Ciphertext length is therefore `padded_len + 32`.
//!
//! There is no authentication: a tampered blob decrypts to garbage and is
//! usually (but not always) caught by the padding's length prefix. Adding an
//! outer MAC or switching to an AEAD would be a compatibility-breaking
//! format change.

use aes::Aes256;
use cipher::block_padding::NoPadding;
use cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use serpent::Serpent;

use crate::error::CryptoError;
use crate::kdf::MasterKey;
use crate::padding;
use crate::rng::{self, RandomQuality};

/// Cipher block size shared by Serpent-256 and AES-256.
pub const BLOCK_SIZE: usize = 16;
/// Per-layer initialization vector length.
pub const IV_SIZE: usize = 16;

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;
type SerpentCbcEnc = cbc::Encryptor<Serpent>;
type SerpentCbcDec = cbc::Decryptor<Serpent>;

fn encrypt_layer<C>(key: &MasterKey, data: &[u8]) -> Result<Vec<u8>, CryptoError>
where
    C: BlockEncryptMut + KeyIvInit,
{
    let iv = rng::random_bytes(IV_SIZE, RandomQuality::VeryStrong)?;
    let layer = C::new_from_slices(key.as_bytes(), &iv)
        .map_err(|e| CryptoError::Cipher(e.to_string()))?;

    let mut buf = data.to_vec();
    let msg_len = buf.len();
    let ciphertext_len = layer
        .encrypt_padded_mut::<NoPadding>(&mut buf, msg_len)
        .map_err(|_| CryptoError::Cipher("input is not block-aligned".to_string()))?
        .len();
    buf.truncate(ciphertext_len);
    buf.extend_from_slice(&iv);
    Ok(buf)
}

fn decrypt_layer<C>(key: &MasterKey, data: &[u8]) -> Result<Vec<u8>, CryptoError>
where
    C: BlockDecryptMut + KeyIvInit,
{
    // Callers guarantee data is longer than one IV.
    let (body, iv) = data.split_at(data.len() - IV_SIZE);
    if body.is_empty() || body.len() % BLOCK_SIZE != 0 {
        return Err(CryptoError::Corrupt);
    }

    let layer = C::new_from_slices(key.as_bytes(), iv)
        .map_err(|e| CryptoError::Cipher(e.to_string()))?;

    let mut buf = body.to_vec();
    let plaintext_len = layer
        .decrypt_padded_mut::<NoPadding>(&mut buf)
        .map_err(|_| CryptoError::Corrupt)?
        .len();
    buf.truncate(plaintext_len);
    Ok(buf)
}

/// Encrypt `plaintext` under `key` with the two-layer pipeline.
///
/// Both layers require a 32-octet key; anything else fails at cipher setup.
pub fn encrypt(key: &MasterKey, plaintext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    let padded = padding::pad(plaintext, BLOCK_SIZE)?;
    let inner = encrypt_layer::<SerpentCbcEnc>(key, &padded)?;
    encrypt_layer::<Aes256CbcEnc>(key, &inner)
}

/// Decrypt a blob produced by [`encrypt`].
///
/// Inputs no longer than a single IV decrypt to the empty plaintext rather
/// than an error, at either layer.
pub fn decrypt(key: &MasterKey, ciphertext: &[u8]) -> Result<Vec<u8>, CryptoError> {
    if ciphertext.len() <= IV_SIZE {
        return Ok(Vec::new());
    }
    let inner = decrypt_layer::<Aes256CbcDec>(key, ciphertext)?;
    if inner.len() <= IV_SIZE {
        return Ok(Vec::new());
    }
    let padded = decrypt_layer::<SerpentCbcDec>(key, &inner)?;
    padding::unpad(padded)
}
