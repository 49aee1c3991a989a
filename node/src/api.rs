//! # REST + WebSocket API
//!
//! Builds the axum router the local frontend talks to. Every handler goes
//! through the shared [`VaultApp`]; none of them touch the vault directly.
//!
//! ## Endpoints
//!
//! | Method | Path                  | Description                              |
//! |--------|-----------------------|------------------------------------------|
//! | GET    | `/health`             | Liveness probe                           |
//! | GET    | `/state`              | Full app snapshot                        |
//! | POST   | `/auth/signin`        | Sign in                                  |
//! | POST   | `/auth/signup`        | Sign up                                  |
//! | POST   | `/auth/signout`       | Sign out (also disconnects the wallet)   |
//! | POST   | `/wallet/connect`     | Connect a mock wallet                    |
//! | POST   | `/wallet/disconnect`  | Drop the wallet connection               |
//! | POST   | `/vault/unlock-delay` | Schedule the unlock (or edit the draft)  |
//! | POST   | `/vault/deposit`      | Deposit `{ "amount": <ADA> }`            |
//! | POST   | `/vault/withdraw`     | Withdraw to the connected wallet         |
//! | GET    | `/vault/status`       | Vault status                             |
//! | GET    | `/ws`                 | Snapshot push on every change            |

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use timelock_vault::ada::Lovelace;
use timelock_vault::app::{AppError, AppSnapshot, VaultApp};
use timelock_vault::session::{AuthError, Credentials};
use timelock_vault::vault::{
    DepositReceipt, LossyUnlockDelay, UnlockDelay, VaultStatus, WithdrawalReceipt,
};

use crate::metrics::SharedMetrics;

// ---------------------------------------------------------------------------
// Application State
// ---------------------------------------------------------------------------

/// Shared state available to all request handlers. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Reported version string.
    pub version: String,
    /// The single app store behind every route.
    pub app: Arc<VaultApp>,
    /// Prometheus handles for in-handler recording.
    pub metrics: SharedMetrics,
}

// ---------------------------------------------------------------------------
// Router Construction
// ---------------------------------------------------------------------------

/// Builds the full axum [`Router`] with all API routes, CORS, and tracing.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_handler))
        .route("/state", get(state_handler))
        .route("/auth/signin", post(sign_in_handler))
        .route("/auth/signup", post(sign_up_handler))
        .route("/auth/signout", post(sign_out_handler))
        .route("/wallet/connect", post(connect_wallet_handler))
        .route("/wallet/disconnect", post(disconnect_wallet_handler))
        .route("/vault/unlock-delay", post(unlock_delay_handler))
        .route("/vault/deposit", post(deposit_handler))
        .route("/vault/withdraw", post(withdraw_handler))
        .route("/vault/status", get(vault_status_handler))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / Response Types
// ---------------------------------------------------------------------------

/// Body of `POST /vault/unlock-delay`.
#[derive(Debug, Deserialize)]
pub struct UnlockDelayRequest {
    #[serde(flatten)]
    pub delay: LossyUnlockDelay,
    /// Only update the form values; schedule nothing.
    #[serde(default)]
    pub draft: bool,
}

/// Body of `POST /vault/deposit`. The amount may be a JSON number or a
/// string as typed by the user.
#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    #[serde(default)]
    pub amount: serde_json::Value,
}

/// Response payload for `POST /auth/signin` and `/auth/signup`.
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub email: String,
}

/// Response payload for `POST /wallet/connect`.
#[derive(Debug, Serialize, Deserialize)]
pub struct WalletResponse {
    pub address: String,
    pub short_address: String,
    pub balance: Lovelace,
}

/// Generic error body returned on failure.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// An [`AppError`] on its way out as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            AppError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AppError::WalletNotConnected => StatusCode::PRECONDITION_FAILED,
            AppError::InvalidAmount => StatusCode::BAD_REQUEST,
            AppError::Auth(AuthError::Session(_))
            | AppError::Session(_)
            | AppError::Interrupted => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Auth(_) => StatusCode::BAD_REQUEST,
            AppError::AlreadyFunded | AppError::UnlockTimeLocked | AppError::Vault(_) => {
                StatusCode::CONFLICT
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if !self.0.is_user_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = ErrorResponse {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /health`: returns 200 while the process is up.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(serde_json::json!({
            "status": "ok",
            "version": state.version,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        })),
    )
}

/// `GET /state`: the latest full snapshot.
async fn state_handler(State(state): State<AppState>) -> Json<AppSnapshot> {
    Json(state.app.snapshot())
}

async fn sign_in_handler(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> ApiResult<AuthResponse> {
    let email = state.app.sign_in(&creds).await?;
    Ok(Json(AuthResponse { email }))
}

async fn sign_up_handler(
    State(state): State<AppState>,
    Json(creds): Json<Credentials>,
) -> ApiResult<AuthResponse> {
    let email = state.app.sign_up(&creds).await?;
    Ok(Json(AuthResponse { email }))
}

async fn sign_out_handler(State(state): State<AppState>) -> Json<AppSnapshot> {
    state.app.sign_out();
    Json(state.app.snapshot())
}

async fn connect_wallet_handler(State(state): State<AppState>) -> ApiResult<WalletResponse> {
    let conn = state.app.connect_wallet().await?;
    state.metrics.wallet_connections_total.inc();
    Ok(Json(WalletResponse {
        short_address: conn.short_address(),
        address: conn.address,
        balance: conn.balance,
    }))
}

async fn disconnect_wallet_handler(State(state): State<AppState>) -> Json<AppSnapshot> {
    state.app.disconnect_wallet();
    Json(state.app.snapshot())
}

/// `POST /vault/unlock-delay`: schedules the unlock, or with
/// `"draft": true` only updates the form values.
async fn unlock_delay_handler(
    State(state): State<AppState>,
    Json(req): Json<UnlockDelayRequest>,
) -> Result<Response, ApiError> {
    let delay = UnlockDelay::from(req.delay);
    if req.draft {
        state.app.set_draft_delay(delay);
        return Ok(Json(state.app.snapshot()).into_response());
    }
    let status: VaultStatus = state.app.schedule_unlock(delay).await?;
    Ok(Json(status).into_response())
}

/// `POST /vault/deposit`.
async fn deposit_handler(
    State(state): State<AppState>,
    Json(req): Json<DepositRequest>,
) -> ApiResult<DepositReceipt> {
    let amount = match req.amount {
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::String(s) => s,
        _ => String::new(),
    };

    let timer = state
        .metrics
        .operation_latency_seconds
        .with_label_values(&["deposit"])
        .start_timer();
    let receipt = state.app.deposit_ada(&amount).await?;
    timer.observe_duration();

    state.metrics.deposits_total.inc();
    record_balance(&state);
    Ok(Json(receipt))
}

/// `POST /vault/withdraw`.
async fn withdraw_handler(State(state): State<AppState>) -> ApiResult<WithdrawalReceipt> {
    let timer = state
        .metrics
        .operation_latency_seconds
        .with_label_values(&["withdraw"])
        .start_timer();
    let result = state.app.withdraw().await;
    timer.observe_duration();

    match result {
        Ok(receipt) => {
            state.metrics.withdrawals_total.inc();
            record_balance(&state);
            Ok(Json(receipt))
        }
        Err(e) => {
            if matches!(e, AppError::Vault(_)) {
                state.metrics.withdrawals_rejected_total.inc();
            }
            Err(e.into())
        }
    }
}

async fn vault_status_handler(State(state): State<AppState>) -> Json<VaultStatus> {
    Json(state.app.vault_status())
}

fn record_balance(state: &AppState) {
    let held = state.app.vault_status().deposited_amount.get();
    state
        .metrics
        .deposited_lovelace
        .set(i64::try_from(held).unwrap_or(i64::MAX));
}

// ---------------------------------------------------------------------------
// WebSocket
// ---------------------------------------------------------------------------

/// `GET /ws`: upgrades to a push-only snapshot feed.
async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_ws_connection(socket, state.app))
}

/// Sends the current snapshot, then one more each time the app publishes,
/// until the client disconnects. The periodic refresh task publishes once a
/// second, which keeps countdowns moving.
async fn handle_ws_connection(mut socket: WebSocket, app: Arc<VaultApp>) {
    let mut rx = app.subscribe();
    let initial = rx.borrow_and_update().clone();
    if send_snapshot(&mut socket, &initial).await.is_err() {
        return;
    }

    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = rx.borrow_and_update().clone();
                if send_snapshot(&mut socket, &snapshot).await.is_err() {
                    // Client disconnected.
                    break;
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(_)) => {
                        // Client messages are ignored.
                    }
                    _ => break,
                }
            }
        }
    }

    tracing::debug!("ws connection closed");
}

async fn send_snapshot(socket: &mut WebSocket, snapshot: &AppSnapshot) -> Result<(), ()> {
    let payload = match serde_json::to_string(snapshot) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!("failed to serialize snapshot: {}", e);
            return Ok(());
        }
    };
    socket
        .send(Message::Text(payload))
        .await
        .map_err(|_| ())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
