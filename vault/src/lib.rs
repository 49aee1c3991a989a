// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Time-Locked Vault: Core Library
//!
//! A demo of a time-locked payment vault: sign in, connect a mock wallet,
//! pick an unlock delay, deposit, and withdraw once the clock says so.
//! Nothing here touches a ledger. Every "transaction" is a simulated delay
//! that hands back a fabricated hash, and the only state that outlives the
//! process is the authentication flag in the session store.
//!
//! ## Architecture
//!
//! - **vault**: The vault state model: unlock arithmetic, deposit/withdraw,
//!   status snapshots. The only part with real rules.
//! - **clock**: Injectable wall-clock time. Tests bring their own.
//! - **latency**: Injectable simulated delay. Tests skip it.
//! - **session**: Key-value session store and the local authenticator.
//! - **wallet**: Mock wallet connection with a random address and balance.
//! - **app**: The state owner behind the UI: reducer, status banner, and a
//!   snapshot channel.
//! - **ada**: Lovelace amounts and ADA display helpers.
//! - **ids**: Fabricated vault addresses and transaction hashes.
//! - **deploy**: The scripted deployment log.
//! - **config**: Constants: delays, prefixes, ports.
//!
//! ## Design Philosophy
//!
//! 1. Amounts are integers. ADA decimals exist only at the edges.
//! 2. Time is injected. No operation reads the system clock directly.
//! 3. Mutations hand back values. Observers read snapshots, never the live
//!    vault.

pub mod ada;
pub mod app;
pub mod clock;
pub mod config;
pub mod deploy;
pub mod ids;
pub mod latency;
pub mod session;
pub mod vault;
pub mod wallet;
