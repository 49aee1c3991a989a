//! # Session Module
//!
//! The signed-in state of the demo is one key in a [`SessionStore`]. A
//! [`SessionContext`] is the explicit handle to that store: opened once at
//! startup, passed to whatever needs to know who is signed in, and closed
//! at shutdown so a file-backed store is flushed.
//!
//! ```text
//! store.rs: SessionStore trait, in-memory and JSON-file backends
//! auth.rs : credential validation and the Authenticator
//! ```

pub mod auth;
pub mod store;

use std::sync::Arc;

pub use auth::{AuthError, AuthMode, Authenticator, Credentials};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, SessionStoreError};

use crate::config::AUTH_SESSION_KEY;

/// Handle to the session flag for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct SessionContext {
    store: Arc<dyn SessionStore>,
}

impl SessionContext {
    /// Attaches to `store`. A flag left by a previous run counts as signed in.
    pub fn open(store: Arc<dyn SessionStore>) -> Self {
        let ctx = Self { store };
        match ctx.email() {
            Some(email) => tracing::info!(%email, "restored signed-in session"),
            None => tracing::debug!("no signed-in session to restore"),
        }
        ctx
    }

    /// The signed-in email, if any. Store failures read as signed out.
    pub fn email(&self) -> Option<String> {
        match self.store.get(AUTH_SESSION_KEY) {
            Ok(email) => email,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read session flag");
                None
            }
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.email().is_some()
    }

    /// Sets the session flag.
    pub fn mark_signed_in(&self, email: &str) -> Result<(), SessionStoreError> {
        self.store.set(AUTH_SESSION_KEY, email)
    }

    /// Clears the session flag. Failures are logged; signing out never
    /// fails from the user's point of view.
    pub fn sign_out(&self) {
        if let Err(e) = self.store.remove(AUTH_SESSION_KEY) {
            tracing::warn!(error = %e, "failed to clear session flag");
        }
    }

    /// Flushes the store. Call once at shutdown.
    pub fn close(self) -> Result<(), SessionStoreError> {
        self.store.flush()?;
        tracing::debug!("session context closed");
        Ok(())
    }
}
