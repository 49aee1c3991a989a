//! Error types for vault operations.

use thiserror::Error;

/// Recoverable failures of a withdrawal. Deposits cannot fail.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum VaultError {
    /// The unlock time is unset or still in the future.
    #[error("Vault is still locked")]
    Locked,

    /// The vault is unlocked but holds nothing.
    #[error("No funds to withdraw")]
    NoFunds,
}
