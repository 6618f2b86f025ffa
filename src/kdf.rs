//! # Key Derivation
//!
//! A repository's master key is derived from the user's passphrase and the
//! repository salt with scrypt. The cost parameters live in the encryption
//! header so that derivation stays reproducible for the repository's whole
//! lifetime; `r` is fixed at 8 and the header's work factor is log2 of the
//! CPU/memory cost `N`.
//!
//! Master keys are ephemeral: derived for a single read or write, then
//! zeroed on drop. They are never written to disk.

use scrypt::Params;
use zeroize::Zeroizing;

use crate::error::CryptoError;

/// Length of a derived master key, in octets.
pub const DEFAULT_KEY_SIZE_OCTETS: usize = 32;
/// Default scrypt cost, expressed as log2(N).
pub const DEFAULT_WORK_FACTOR: u8 = 20;
/// Default scrypt parallelization parameter.
pub const DEFAULT_PARALLELIZATION_FACTOR: u32 = 1;
/// Length of a freshly generated repository salt.
pub const DEFAULT_SALT_SIZE: usize = 16;

const SCRYPT_R: u32 = 8;

/// A derived symmetric key. The backing bytes are zeroed when the value is
/// dropped.
pub struct MasterKey {
    key: Zeroizing<Vec<u8>>,
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey").finish_non_exhaustive()
    }
}

impl MasterKey {
    /// Derive a key of `key_size` octets from the passphrase and salt.
    ///
    /// Identical inputs always produce identical keys; scrypt parameter
    /// rejection (or resource exhaustion) surfaces as [`CryptoError::Kdf`].
    pub fn derive(
        passphrase: &[u8],
        salt: &[u8],
        key_size: usize,
        work_factor: u8,
        parallelization_factor: u32,
    ) -> Result<MasterKey, CryptoError> {
        let params = Params::new(work_factor, SCRYPT_R, parallelization_factor, key_size)
            .map_err(|e| CryptoError::Kdf(e.to_string()))?;

        let mut key = Zeroizing::new(vec![0u8; key_size]);
        scrypt::scrypt(passphrase, salt, &params, &mut key)
            .map_err(|e| CryptoError::Kdf(e.to_string()))?;
        Ok(MasterKey { key })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.key
    }

    pub fn len(&self) -> usize {
        self.key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference vectors with key_size = 32, work_factor = 14, p = 1.
    const VECTORS: &[(&str, &str, &str)] = &[
        (
            "",
            "test",
            "197c60e438ab4c8ed6cb904fed1286baaa48ea0b8b3c0df843a413d2b93a651a",
        ),
        (
            "password",
            "NaCl",
            "33404cf8a31cf5c5a09448b1bd11ec4d7ee18275792a792892de9998f00934a6",
        ),
        (
            "pleaseletmein",
            "SodiumChloride",
            "0c7c762d60c3d29810ed106af2a98e2c9c603ed8beaafe192c0f147fadbd8757",
        ),
    ];

    #[test]
    fn test_reference_vectors() {
        for (passphrase, salt, expected) in VECTORS {
            let key =
                MasterKey::derive(passphrase.as_bytes(), salt.as_bytes(), 32, 14, 1).unwrap();
            assert_eq!(
                hex::encode(key.as_bytes()),
                *expected,
                "vector for passphrase {:?} diverged",
                passphrase
            );
        }
    }

    #[test]
    fn test_determinism_and_length() {
        for key_size in [16usize, 32, 64] {
            for parallelization in [1u32, 2] {
                let a = MasterKey::derive(b"passphrase", b"salt", key_size, 10, parallelization)
                    .unwrap();
                let b = MasterKey::derive(b"passphrase", b"salt", key_size, 10, parallelization)
                    .unwrap();
                assert_eq!(a.as_bytes(), b.as_bytes());
                assert_eq!(a.len(), key_size);
            }
        }
    }

    #[test]
    fn test_different_salts_give_different_keys() {
        let a = MasterKey::derive(b"passphrase", b"salt one", 32, 10, 1).unwrap();
        let b = MasterKey::derive(b"passphrase", b"salt two", 32, 10, 1).unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_empty_passphrase_is_allowed() {
        let key = MasterKey::derive(b"", b"salt", 32, 10, 1).unwrap();
        assert_eq!(key.len(), 32);
    }

    #[test]
    fn test_invalid_parameters_rejected() {
        // A work factor of 64 would overflow N = 2^w.
        assert!(matches!(
            MasterKey::derive(b"passphrase", b"salt", 32, 64, 1).unwrap_err(),
            CryptoError::Kdf(_)
        ));
    }
}
