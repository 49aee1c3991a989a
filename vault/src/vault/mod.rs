//! # Vault Module: Time-Locked State Model
//!
//! The vault is the one part of the demo with actual rules: an amount goes
//! in, a clock runs, and the amount only comes out once the clock has
//! passed the unlock time.
//!
//! ## Architecture
//!
//! ```text
//! lock.rs  : Unlock delays and countdown text
//! state.rs : Plain vault fields and clock-free status queries
//! model.rs : The vault itself: clock, latency, deposit, withdraw
//! error.rs : Withdrawal failures
//! ```
//!
//! ## Design Principles
//!
//! 1. **Queries take `now`.** [`VaultState`] answers every question for an
//!    explicit instant; [`TimeLockedVault`] just supplies its clock.
//! 2. **Mutations return values.** Deposits and withdrawals hand back
//!    receipts; status is always a fresh [`VaultStatus`] copy.
//! 3. **Policy lives upstream.** The model never refuses a deposit or a
//!    reconfiguration; the app layer does.

pub mod error;
pub mod lock;
pub mod model;
pub mod state;

pub use error::VaultError;
pub use lock::{format_remaining, LossyUnlockDelay, UnlockDelay};
pub use model::{DepositReceipt, TimeLockedVault, WithdrawalReceipt};
pub use state::{VaultState, VaultStatus};
