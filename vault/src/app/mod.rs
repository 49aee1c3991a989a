//! # App Module
//!
//! Everything between the vault model and whatever renders it.
//!
//! ```text
//! state.rs: UiState reducer, status banner, AppSnapshot
//! store.rs: VaultApp, its policy checks and the snapshot channel
//! ```

pub mod state;
pub mod store;

pub use state::{AppSnapshot, StatusKind, StatusMessage, UiEvent, UiState};
pub use store::VaultApp;

use thiserror::Error;

use crate::session::{AuthError, SessionStoreError};
use crate::vault::VaultError;

/// Why the app refused or failed an operation. The `Display` text is what
/// the status banner shows.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Please sign in first")]
    NotAuthenticated,

    #[error("Connect your wallet to interact with the vault")]
    WalletNotConnected,

    #[error("Please enter a valid amount")]
    InvalidAmount,

    #[error("Vault already holds a deposit")]
    AlreadyFunded,

    #[error("Unlock time cannot change while the vault holds funds")]
    UnlockTimeLocked,

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("session store error: {0}")]
    Session(#[from] SessionStoreError),

    /// The task carrying a deposit or withdrawal panicked or was aborted.
    #[error("vault operation was interrupted")]
    Interrupted,
}

impl AppError {
    /// True for refusals caused by the caller's input or the vault's current
    /// state, as opposed to infrastructure failures.
    pub fn is_user_error(&self) -> bool {
        match self {
            AppError::Session(_)
            | AppError::Auth(AuthError::Session(_))
            | AppError::Interrupted => false,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vault_errors_keep_their_text() {
        let err: AppError = VaultError::Locked.into();
        assert_eq!(err.to_string(), "Vault is still locked");
        let err: AppError = VaultError::NoFunds.into();
        assert_eq!(err.to_string(), "No funds to withdraw");
    }

    #[test]
    fn validation_errors_are_user_errors() {
        assert!(AppError::InvalidAmount.is_user_error());
        assert!(AppError::Auth(AuthError::InvalidEmail).is_user_error());
        assert!(!AppError::Interrupted.is_user_error());
    }
}
