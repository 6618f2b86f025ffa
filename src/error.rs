use std::path::PathBuf;

use thiserror::Error;

/// Errors produced by the cryptographic layer (RNG, KDF, padding, and the
/// encryption pipeline).
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Random number generation failed: {0}")]
    Rng(String),

    #[error("Key derivation failed: {0}")]
    Kdf(String),

    #[error("Cipher operation failed: {0}")]
    Cipher(String),

    #[error("Decryption failed: ciphertext or padding is inconsistent")]
    Corrupt,

    #[error("Cannot generate a password from an empty character set")]
    EmptyAlphabet,
}

#[derive(Error, Debug)]
pub enum GitPassError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Cryptography error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Invalid encryption header: {0}")]
    Header(String),

    #[error("Invalid repository path '{0}'")]
    InvalidPath(String),

    #[error("No stored password at path '{0}'")]
    NotFound(String),

    #[error("No repository at '{}'. Run 'gitpass init' first", .0.display())]
    NotARepository(PathBuf),

    #[error("The repository's key salt changed mid-session")]
    SaltChanged,

    #[error("Already initialized; only one live instance may exist per process")]
    AlreadyInitialized,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, GitPassError>;
