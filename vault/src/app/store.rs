//! # Vault App Store
//!
//! [`VaultApp`] owns everything the UI shows: the session, the wallet
//! connection, the vault, and the status banner. It is the only thing that
//! mutates them, and after every change it publishes a fresh
//! [`AppSnapshot`] on a `tokio::sync::watch` channel. Observers (HTTP
//! handlers, the WebSocket feed, tests) read snapshots and never see the
//! live vault.
//!
//! ## Locking
//!
//! Vault mutations go through a `tokio::sync::Mutex` because deposits and
//! withdrawals await their simulated latency while holding the vault. The
//! published copy of the vault state and the UI state sit behind
//! `parking_lot` locks that are never held across an await, so reads stay
//! instant while a deposit is in flight.
//!
//! ## Policy
//!
//! The vault model accepts anything. This layer refuses:
//!
//! - any wallet or vault operation before sign-in;
//! - vault operations without a connected wallet;
//! - deposits of zero or unparseable amounts;
//! - a second deposit while the vault holds funds;
//! - unlock-time changes while the vault holds funds.
//!
//! ## Cancellation
//!
//! Deposits and withdrawals run on a spawned task that owns the shared
//! state. The caller only awaits the result, so a dropped request still
//! finishes the transaction and publishes it.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{watch, Mutex as AsyncMutex};
use tokio::task::JoinHandle;

use super::state::{AppSnapshot, UiEvent, UiState};
use super::AppError;
use crate::ada::{parse_ada, Lovelace};
use crate::clock::Clock;
use crate::config::{LatencyProfile, STATUS_REFRESH_INTERVAL};
use crate::latency::SharedLatency;
use crate::session::{AuthMode, Authenticator, Credentials, SessionContext};
use crate::vault::{
    DepositReceipt, TimeLockedVault, UnlockDelay, VaultState, VaultStatus, WithdrawalReceipt,
};
use crate::wallet::{MockWallet, WalletConnection};

/// The state owner behind the UI.
#[derive(Debug)]
pub struct VaultApp {
    session: SessionContext,
    authenticator: Authenticator,
    wallet: MockWallet,
    shared: Arc<Shared>,
}

/// The part of the app that detached vault operations keep alive.
#[derive(Debug)]
struct Shared {
    clock: Arc<dyn Clock>,
    vault: AsyncMutex<TimeLockedVault>,
    published_vault: Mutex<VaultState>,
    ui: Mutex<UiState>,
    snapshots: watch::Sender<AppSnapshot>,
}

impl VaultApp {
    /// Builds the app around an opened session and generates the vault
    /// address, ready for the first request.
    pub fn new(
        session: SessionContext,
        clock: Arc<dyn Clock>,
        latency: SharedLatency,
        profile: LatencyProfile,
    ) -> Self {
        let mut vault = TimeLockedVault::new(clock.clone(), latency.clone(), profile);
        vault.generate_address();
        let vault_state = vault.state().clone();

        let ui = UiState::with_email(session.email());
        let initial = AppSnapshot::new(&ui, vault_state.status_at(clock.now_ms()), clock.now_ms());
        let (snapshots, _) = watch::channel(initial);

        tracing::info!(
            vault_address = vault_state.address().unwrap_or_default(),
            authenticated = ui.email.is_some(),
            "vault app initialized"
        );

        Self {
            authenticator: Authenticator::new(latency.clone(), profile.auth),
            wallet: MockWallet::new(latency, profile.wallet_connect),
            session,
            shared: Arc::new(Shared {
                clock,
                vault: AsyncMutex::new(vault),
                published_vault: Mutex::new(vault_state),
                ui: Mutex::new(ui),
                snapshots,
            }),
        }
    }

    // -----------------------------------------------------------------------
    // Observation
    // -----------------------------------------------------------------------

    /// A fresh snapshot computed against the current time.
    pub fn snapshot(&self) -> AppSnapshot {
        self.shared.snapshot()
    }

    /// The vault part of [`snapshot`](Self::snapshot).
    pub fn vault_status(&self) -> VaultStatus {
        self.shared
            .published_vault
            .lock()
            .status_at(self.shared.clock.now_ms())
    }

    /// Subscribes to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<AppSnapshot> {
        self.shared.snapshots.subscribe()
    }

    /// Republishes the current snapshot so countdowns move. Never mutates.
    pub fn refresh(&self) {
        self.shared.publish();
    }

    fn apply(&self, event: UiEvent) {
        self.shared.apply(event);
    }

    fn reject(&self, err: AppError) -> AppError {
        self.shared.reject(err)
    }

    fn require_authenticated(&self) -> Result<(), AppError> {
        if self.shared.ui.lock().email.is_none() {
            return Err(self.reject(AppError::NotAuthenticated));
        }
        Ok(())
    }

    fn require_wallet(&self) -> Result<WalletConnection, AppError> {
        self.require_authenticated()?;
        let wallet = self.shared.ui.lock().wallet.clone();
        wallet.ok_or_else(|| self.reject(AppError::WalletNotConnected))
    }

    // -----------------------------------------------------------------------
    // Authentication
    // -----------------------------------------------------------------------

    pub async fn sign_in(&self, creds: &Credentials) -> Result<String, AppError> {
        self.authenticate(AuthMode::SignIn, creds).await
    }

    pub async fn sign_up(&self, creds: &Credentials) -> Result<String, AppError> {
        self.authenticate(AuthMode::SignUp, creds).await
    }

    /// Validates credentials behind the simulated delay and marks the
    /// session signed in.
    pub async fn authenticate(
        &self,
        mode: AuthMode,
        creds: &Credentials,
    ) -> Result<String, AppError> {
        match self
            .authenticator
            .authenticate(&self.session, mode, creds)
            .await
        {
            Ok(email) => {
                self.apply(UiEvent::Authenticated {
                    email: email.clone(),
                });
                Ok(email)
            }
            Err(e) => {
                self.apply(UiEvent::AuthFailed {
                    message: e.to_string(),
                });
                Err(e.into())
            }
        }
    }

    /// Clears the session flag and disconnects the wallet.
    pub fn sign_out(&self) {
        self.session.sign_out();
        self.apply(UiEvent::SignedOut);
        tracing::info!("signed out");
    }

    // -----------------------------------------------------------------------
    // Wallet
    // -----------------------------------------------------------------------

    /// Connects a mock wallet. Replaces any existing connection.
    pub async fn connect_wallet(&self) -> Result<WalletConnection, AppError> {
        self.require_authenticated()?;
        self.apply(UiEvent::WalletConnecting);

        let conn = self.wallet.connect().await;
        self.apply(UiEvent::WalletConnected(conn.clone()));
        Ok(conn)
    }

    pub fn disconnect_wallet(&self) {
        self.apply(UiEvent::WalletDisconnected);
        tracing::info!("wallet disconnected");
    }

    // -----------------------------------------------------------------------
    // Vault
    // -----------------------------------------------------------------------

    /// Updates the unlock-delay form without scheduling anything.
    pub fn set_draft_delay(&self, delay: UnlockDelay) {
        self.apply(UiEvent::DraftDelayChanged(delay));
    }

    /// Sets the vault's unlock time to now + `delay`.
    ///
    /// # Errors
    ///
    /// [`AppError::UnlockTimeLocked`] while the vault holds funds, plus the
    /// usual sign-in and wallet preconditions.
    pub async fn schedule_unlock(&self, delay: UnlockDelay) -> Result<VaultStatus, AppError> {
        self.require_wallet()?;

        let status = {
            let mut vault = self.shared.vault.lock().await;
            if vault.state().is_funded() {
                return Err(self.reject(AppError::UnlockTimeLocked));
            }
            vault.configure_unlock_delay(delay);
            self.shared.sync_vault(&vault)
        };

        self.apply(UiEvent::UnlockScheduled(delay));
        Ok(status)
    }

    /// Parses a user-typed ADA amount and deposits it.
    pub async fn deposit_ada(&self, amount: &str) -> Result<DepositReceipt, AppError> {
        match parse_ada(amount) {
            Ok(lovelace) => self.deposit(lovelace).await,
            Err(e) => {
                tracing::debug!(input = amount, error = %e, "unparseable deposit amount");
                Err(self.reject(AppError::InvalidAmount))
            }
        }
    }

    /// Deposits from the connected wallet.
    ///
    /// A vault that was never configured first gets the draft's hours as
    /// its delay. Minutes and seconds in the draft are ignored there, so the
    /// default form (0 h) unlocks straight away.
    pub async fn deposit(&self, amount: Lovelace) -> Result<DepositReceipt, AppError> {
        let wallet = self.require_wallet()?;
        if amount.is_zero() {
            return Err(self.reject(AppError::InvalidAmount));
        }

        let shared = Arc::clone(&self.shared);
        run_detached(async move { shared.deposit(amount, wallet.address).await }).await
    }

    /// Withdraws everything to the connected wallet.
    pub async fn withdraw(&self) -> Result<WithdrawalReceipt, AppError> {
        let wallet = self.require_wallet()?;

        let shared = Arc::clone(&self.shared);
        run_detached(async move { shared.withdraw(wallet.address).await }).await
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Spawns the once-a-second display refresh. Abort the handle to stop it.
    pub fn spawn_status_refresh(app: Arc<VaultApp>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(STATUS_REFRESH_INTERVAL);
            loop {
                interval.tick().await;
                app.refresh();
            }
        })
    }

    /// Tears the app down and closes the session context.
    pub fn shutdown(self) -> Result<(), AppError> {
        self.session.close()?;
        tracing::info!("vault app shut down");
        Ok(())
    }
}

/// Runs a vault mutation on its own task. Dropping the caller's future
/// (a client hanging up mid-request) leaves the task running, so the vault,
/// its published copy and the banner always end up consistent.
async fn run_detached<T, F>(op: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, AppError>> + Send + 'static,
{
    tokio::spawn(op).await.map_err(|e| {
        tracing::error!(error = %e, "vault operation task failed");
        AppError::Interrupted
    })?
}

impl Shared {
    fn snapshot(&self) -> AppSnapshot {
        let now = self.clock.now_ms();
        let vault = self.published_vault.lock().status_at(now);
        let ui = self.ui.lock();
        AppSnapshot::new(&ui, vault, now)
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }

    fn apply(&self, event: UiEvent) {
        {
            let mut ui = self.ui.lock();
            let current = std::mem::take(&mut *ui);
            *ui = current.reduce(event);
        }
        self.publish();
    }

    fn reject(&self, err: AppError) -> AppError {
        tracing::debug!(error = %err, "operation rejected");
        self.apply(UiEvent::Rejected {
            message: err.to_string(),
        });
        err
    }

    fn sync_vault(&self, vault: &TimeLockedVault) -> VaultStatus {
        let state = vault.state().clone();
        let status = state.status_at(self.clock.now_ms());
        *self.published_vault.lock() = state;
        status
    }

    async fn deposit(
        &self,
        amount: Lovelace,
        depositor: String,
    ) -> Result<DepositReceipt, AppError> {
        let mut vault = self.vault.lock().await;
        if vault.state().is_funded() {
            let err = AppError::AlreadyFunded;
            self.apply(UiEvent::DepositFailed {
                message: err.to_string(),
            });
            return Err(err);
        }

        self.apply(UiEvent::DepositStarted);
        if vault.state().unlock_time_ms().is_none() {
            let hours = self.ui.lock().draft_delay.hours;
            vault.set_unlock_hours(hours);
        }

        let receipt = vault.deposit(amount, &depositor).await;
        self.sync_vault(&vault);
        drop(vault);

        self.apply(UiEvent::Deposited { amount });
        Ok(receipt)
    }

    async fn withdraw(&self, recipient: String) -> Result<WithdrawalReceipt, AppError> {
        let mut vault = self.vault.lock().await;
        self.apply(UiEvent::WithdrawStarted);

        let result = vault.withdraw(&recipient).await;
        self.sync_vault(&vault);
        drop(vault);

        match result {
            Ok(receipt) => {
                self.apply(UiEvent::Withdrew {
                    amount: receipt.amount,
                });
                Ok(receipt)
            }
            Err(e) => {
                tracing::info!(error = %e, "withdrawal refused");
                self.apply(UiEvent::WithdrawFailed {
                    message: e.to_string(),
                });
                Err(e.into())
            }
        }
    }
}
