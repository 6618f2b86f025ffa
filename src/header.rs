//! # Encryption Header
//!
//! Every repository carries a small parameter block at the reserved path
//! `.header` inside the working tree. It records everything needed to
//! re-derive the master key: the salt (base64 at rest) and the scrypt cost
//! parameters. The header is tracked and committed like any other file, so
//! cloning the repository is enough to decrypt it elsewhere.
//!
//! The salt is generated once, on the first open of a repository without a
//! header, and must never change afterwards: every stored entry is bound to
//! it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GitPassError, Result};
use crate::kdf::{
    DEFAULT_KEY_SIZE_OCTETS, DEFAULT_PARALLELIZATION_FACTOR, DEFAULT_SALT_SIZE,
    DEFAULT_WORK_FACTOR,
};
use crate::rng;

/// Relative path of the header file inside the working tree.
pub const HEADER_RELATIVE_PATH: &str = ".header";
/// Commit message used for every header update.
pub const HEADER_UPDATE_MESSAGE: &str = "Update encryption header contents.";

mod salt_encoding {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD.decode(text.as_bytes()).map_err(serde::de::Error::custom)
    }
}

fn default_key_size() -> usize {
    DEFAULT_KEY_SIZE_OCTETS
}

fn default_work_factor() -> u8 {
    DEFAULT_WORK_FACTOR
}

fn default_parallelization_factor() -> u32 {
    DEFAULT_PARALLELIZATION_FACTOR
}

/// The persisted key-derivation parameters of one repository.
///
/// Unknown fields found in an existing header file are preserved across a
/// load/store cycle so that newer versions of the format can round-trip
/// through older binaries.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct EncryptionHeader {
    #[serde(rename = "salt", with = "salt_encoding", default)]
    salt: Vec<u8>,

    #[serde(rename = "keysize", default = "default_key_size")]
    key_size: usize,

    #[serde(rename = "workfactor", default = "default_work_factor")]
    work_factor: u8,

    #[serde(rename = "parallelizationfactor", default = "default_parallelization_factor")]
    parallelization_factor: u32,

    #[serde(flatten)]
    extra: serde_json::Map<String, serde_json::Value>,
}

impl EncryptionHeader {
    /// Absolute path of the header file for the given working directory.
    pub fn path_in(workdir: &Path) -> PathBuf {
        workdir.join(HEADER_RELATIVE_PATH)
    }

    /// Build a header with default parameters and a fresh random salt.
    pub fn defaulted() -> Result<EncryptionHeader> {
        Ok(EncryptionHeader {
            salt: rng::generate_salt(DEFAULT_SALT_SIZE)?,
            key_size: DEFAULT_KEY_SIZE_OCTETS,
            work_factor: DEFAULT_WORK_FACTOR,
            parallelization_factor: DEFAULT_PARALLELIZATION_FACTOR,
            extra: serde_json::Map::new(),
        })
    }

    /// Load the header for `workdir`, defaulting it (with a fresh salt) if
    /// the file is absent or empty. Fields missing from an existing file
    /// take their default values; an empty stored salt is replaced with a
    /// fresh one.
    pub fn open(workdir: &Path) -> Result<EncryptionHeader> {
        let path = Self::path_in(workdir);
        if !path.exists() {
            return Self::defaulted();
        }

        let contents = fs::read_to_string(&path)?;
        if contents.trim().is_empty() {
            return Self::defaulted();
        }

        let mut header: EncryptionHeader = serde_json::from_str(&contents)
            .map_err(|e| GitPassError::Header(e.to_string()))?;
        if header.salt.is_empty() {
            header.salt = rng::generate_salt(DEFAULT_SALT_SIZE)?;
        }
        Ok(header)
    }

    /// Re-serialize the header into `workdir`.
    pub fn write_to(&self, workdir: &Path) -> Result<()> {
        let mut serialized = serde_json::to_string_pretty(self)
            .map_err(|e| GitPassError::Header(e.to_string()))?;
        serialized.push('\n');
        fs::write(Self::path_in(workdir), serialized)?;
        Ok(())
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn key_size(&self) -> usize {
        self.key_size
    }

    pub fn work_factor(&self) -> u8 {
        self.work_factor
    }

    pub fn parallelization_factor(&self) -> u32 {
        self.parallelization_factor
    }
}
