//! # UI State & Reducer
//!
//! The synchronous half of the app state (who is signed in, which wallet is
//! connected, what the status banner says, what the unlock form holds) is a
//! plain value updated by a pure reducer. Every change is an explicit
//! [`UiEvent`]; nothing mutates [`UiState`] in place.

use serde::{Deserialize, Serialize};

use crate::ada::{format_ada, Lovelace};
use crate::config::DEFAULT_UNLOCK_DELAY_SECONDS;
use crate::vault::{UnlockDelay, VaultStatus};
use crate::wallet::WalletConnection;

/// Tone of the status banner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    #[default]
    Info,
    Success,
    Error,
}

/// The one-line banner shown above everything else.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusMessage {
    pub kind: StatusKind,
    /// Empty means "no banner".
    pub message: String,
}

impl StatusMessage {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            message: message.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.message.is_empty()
    }
}

/// Things that happen to the UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    Authenticated { email: String },
    AuthFailed { message: String },
    SignedOut,
    WalletConnecting,
    WalletConnected(WalletConnection),
    WalletDisconnected,
    DraftDelayChanged(UnlockDelay),
    UnlockScheduled(UnlockDelay),
    DepositStarted,
    Deposited { amount: Lovelace },
    DepositFailed { message: String },
    WithdrawStarted,
    Withdrew { amount: Lovelace },
    WithdrawFailed { message: String },
    /// An operation was refused before it started.
    Rejected { message: String },
}

/// Synchronous UI state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UiState {
    pub email: Option<String>,
    pub wallet: Option<WalletConnection>,
    pub status: StatusMessage,
    /// Values currently in the unlock-delay form.
    pub draft_delay: UnlockDelay,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            email: None,
            wallet: None,
            status: StatusMessage::default(),
            draft_delay: UnlockDelay::from_seconds(DEFAULT_UNLOCK_DELAY_SECONDS),
        }
    }
}

impl UiState {
    /// Starting state for a session that may already be signed in.
    pub fn with_email(email: Option<String>) -> Self {
        Self {
            email,
            ..Self::default()
        }
    }

    /// Applies one event and returns the next state.
    pub fn reduce(self, event: UiEvent) -> UiState {
        match event {
            UiEvent::Authenticated { email } => UiState {
                email: Some(email),
                status: StatusMessage::default(),
                ..self
            },
            UiEvent::AuthFailed { message } => UiState {
                status: StatusMessage::error(message),
                ..self
            },
            UiEvent::SignedOut => UiState {
                email: None,
                wallet: None,
                status: StatusMessage::info("Signed out"),
                ..self
            },
            UiEvent::WalletConnecting => UiState {
                status: StatusMessage::info("Connecting to Vesper Wallet..."),
                ..self
            },
            UiEvent::WalletConnected(conn) => UiState {
                wallet: Some(conn),
                status: StatusMessage::success("Wallet connected successfully!"),
                ..self
            },
            UiEvent::WalletDisconnected => UiState {
                wallet: None,
                status: StatusMessage::info("Wallet disconnected"),
                ..self
            },
            UiEvent::DraftDelayChanged(delay) => UiState {
                draft_delay: delay,
                ..self
            },
            UiEvent::UnlockScheduled(delay) => UiState {
                draft_delay: delay,
                status: StatusMessage::success(format!("Vault will unlock in {delay}")),
                ..self
            },
            UiEvent::DepositStarted => UiState {
                status: StatusMessage::info("Processing deposit..."),
                ..self
            },
            UiEvent::Deposited { amount } => UiState {
                status: StatusMessage::success(format!(
                    "Successfully deposited {} to vault!",
                    format_ada(amount)
                )),
                ..self
            },
            UiEvent::DepositFailed { message } => UiState {
                status: StatusMessage::error(format!("Deposit failed: {message}")),
                ..self
            },
            UiEvent::WithdrawStarted => UiState {
                status: StatusMessage::info("Processing withdrawal..."),
                ..self
            },
            UiEvent::Withdrew { amount } => UiState {
                status: StatusMessage::success(format!(
                    "Successfully withdrew {} from vault!",
                    format_ada(amount)
                )),
                ..self
            },
            UiEvent::WithdrawFailed { message } => UiState {
                status: StatusMessage::error(format!("Withdrawal failed: {message}")),
                ..self
            },
            UiEvent::Rejected { message } => UiState {
                status: StatusMessage::error(message),
                ..self
            },
        }
    }
}

/// Immutable picture of the whole app, published after every change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSnapshot {
    /// Signed-in email.
    pub authenticated: Option<String>,
    pub wallet: Option<WalletConnection>,
    pub vault: VaultStatus,
    pub status: StatusMessage,
    pub draft_delay: UnlockDelay,
    /// When this snapshot was taken (ms since epoch).
    pub taken_at_ms: u64,
}

impl AppSnapshot {
    pub fn new(ui: &UiState, vault: VaultStatus, taken_at_ms: u64) -> Self {
        Self {
            authenticated: ui.email.clone(),
            wallet: ui.wallet.clone(),
            vault,
            status: ui.status.clone(),
            draft_delay: ui.draft_delay,
            taken_at_ms,
        }
    }
}
