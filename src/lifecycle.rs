//! # Process Lifecycle
//!
//! Repository operations depend on process-wide library state (libgit2
//! initialization in particular). Instead of a mutable global, that state is
//! modeled as a scoped token: acquire a [`Lifecycle`] once near the top of
//! the program, pass a reference to it into [`crate::repository::Repository::open`],
//! and let it drop on the way out.
//!
//! Only one live token may exist per process; a second acquisition fails
//! rather than silently re-initializing shared state.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{GitPassError, Result};

static LIFECYCLE_HELD: AtomicBool = AtomicBool::new(false);

/// Witness that process-wide initialization has happened and is still valid.
///
/// The token is deliberately not `Clone`: the holder defines the span during
/// which repository operations are allowed.
#[derive(Debug)]
pub struct Lifecycle {
    _private: (),
}

impl Lifecycle {
    /// Acquire the process-wide lifecycle token.
    pub fn acquire() -> Result<Lifecycle> {
        if LIFECYCLE_HELD.swap(true, Ordering::SeqCst) {
            return Err(GitPassError::AlreadyInitialized);
        }
        Ok(Lifecycle { _private: () })
    }
}

impl Drop for Lifecycle {
    fn drop(&mut self) {
        LIFECYCLE_HELD.store(false, Ordering::SeqCst);
    }
}
