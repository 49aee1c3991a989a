//! # Local Authentication
//!
//! Demo-grade sign-in and sign-up. There are no accounts and no password
//! storage: a request passes if the email looks like an email, the password
//! is long enough, and (for sign-up) the confirmation matches. A pass writes
//! the email into the session store, which is all "signed in" means here.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::store::SessionStoreError;
use super::SessionContext;
use crate::config::{EMAIL_PATTERN, MIN_PASSWORD_LENGTH};
use crate::latency::SharedLatency;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("invalid email pattern"));

/// Validation and storage failures of a sign-in or sign-up.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Enter a valid email")]
    InvalidEmail,

    #[error("Password must be at least {} characters", MIN_PASSWORD_LENGTH)]
    PasswordTooShort,

    #[error("Passwords do not match")]
    PasswordMismatch,

    /// The credentials were fine but the session flag could not be written.
    #[error("Authentication failed: {0}")]
    Session(#[from] SessionStoreError),
}

/// Which form the user submitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
}

/// What the user typed.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    /// Only consulted in [`AuthMode::SignUp`].
    #[serde(default)]
    pub confirm_password: Option<String>,
}

impl Credentials {
    pub fn sign_in(email: &str, password: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: None,
        }
    }

    pub fn sign_up(email: &str, password: &str, confirm: &str) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            confirm_password: Some(confirm.to_string()),
        }
    }
}

/// Checks credentials in form order: email, password length, confirmation.
pub fn validate(mode: AuthMode, creds: &Credentials) -> Result<(), AuthError> {
    if creds.email.is_empty() || !EMAIL_RE.is_match(&creds.email) {
        return Err(AuthError::InvalidEmail);
    }
    if creds.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::PasswordTooShort);
    }
    if mode == AuthMode::SignUp
        && creds.confirm_password.as_deref() != Some(creds.password.as_str())
    {
        return Err(AuthError::PasswordMismatch);
    }
    Ok(())
}

/// Runs credential checks behind a simulated round-trip.
#[derive(Debug, Clone)]
pub struct Authenticator {
    latency: SharedLatency,
    delay: Duration,
}

impl Authenticator {
    pub fn new(latency: SharedLatency, delay: Duration) -> Self {
        Self { latency, delay }
    }

    /// Waits out the simulated delay, validates, and on success marks the
    /// session as signed in. Returns the accepted email.
    pub async fn authenticate(
        &self,
        session: &SessionContext,
        mode: AuthMode,
        creds: &Credentials,
    ) -> Result<String, AuthError> {
        self.latency.pause(self.delay).await;

        if let Err(e) = validate(mode, creds) {
            tracing::debug!(?mode, error = %e, "credentials rejected");
            return Err(e);
        }

        session.mark_signed_in(&creds.email)?;
        tracing::info!(?mode, email = %creds.email, "user authenticated");
        Ok(creds.email.clone())
    }
}
