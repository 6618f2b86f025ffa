//! # gitpass
//!
//! A personal password store that keeps every entry as an individually
//! encrypted blob inside a git repository. Each write creates a commit, so
//! history is preserved and any previous value is recoverable with plain
//! git tooling.
//!
//! ## Quick Start
//!
//! ```bash
//! # Point gitpass at a repository once
//! gitpass config --key default_repository --set ~/passwords
//!
//! # Create the repository (also writes the encryption header)
//! gitpass init
//!
//! # Store and read entries
//! gitpass pw --set email/work
//! gitpass pw email/work
//!
//! # List what is stored
//! gitpass ls
//!
//! # Generate a fresh password
//! gitpass generate --min-length 16 --max-length 24
//! ```
//!
//! ## How It Works
//!
//! A repository is an ordinary git working tree. One reserved file,
//! `.header`, records the key-derivation parameters (a random salt plus
//! scrypt costs); every other tracked file is the ciphertext of one entry,
//! named by its logical path:
//!
//! ```text
//! ~/passwords/
//! ├── .git/            (history: one commit per change)
//! ├── .header          (salt + scrypt parameters, committed)
//! └── email/work       (ciphertext entry)
//! ```
//!
//! For every read or write the user's passphrase is combined with the
//! header's salt and cost parameters by scrypt to produce an ephemeral
//! master key; the key is zeroed again as soon as the operation finishes.
//! Nothing derived from the passphrase is ever stored.
//!
//! ## Cryptography
//!
//! - **KDF**: scrypt, `N = 2^workfactor` (default 2^20), `r = 8`,
//!   configurable parallelization, 32-byte keys.
//! - **Encryption**: two CBC layers (Serpent-256 inside, AES-256 outside),
//!   each with a fresh random 16-byte IV appended after its ciphertext.
//! - **Padding**: the plaintext length is embedded as a little-endian
//!   64-bit prefix and the tail is filled with random bytes, so stored
//!   sizes reveal only a block count.
//! - **No authentication**: a tampered blob decrypts to garbage rather
//!   than an error. The threat model is a stolen disk, not an active
//!   attacker with write access to the store.
//!
//! ## Module Overview
//!
//! - [`repository`] - Repository handle: entry read/write/list, commits
//! - [`header`] - Persisted per-repository encryption parameters
//! - [`cipher`] - The double-layer CBC encryption pipeline
//! - [`kdf`] - scrypt master-key derivation
//! - [`rng`] / [`padding`] - Secure randomness and block padding
//! - [`generator`] - Policy-driven password generation
//! - [`path`] - Entry path validation and normalization
//! - [`git`] - Version-control plumbing (libgit2)
//! - [`prompt`] - Passphrase prompting seam
//! - [`config`] - On-disk CLI configuration
//! - [`lifecycle`] - Process-wide initialization token
//! - [`error`] - Error types and the crate-wide `Result`

pub mod cipher;
pub mod config;
pub mod error;
pub mod generator;
pub mod git;
pub mod header;
pub mod kdf;
pub mod lifecycle;
pub mod padding;
pub mod path;
pub mod prompt;
pub mod repository;
pub mod rng;

pub use error::{CryptoError, GitPassError, Result};
pub use header::EncryptionHeader;
pub use kdf::MasterKey;
pub use lifecycle::Lifecycle;
pub use path::EntryPath;
pub use repository::Repository;
