//! Tokio host glue for the match engine
//!
//! The engine is synchronous and never sleeps; this crate supplies the pieces an async host
//! needs around it:
//!
//! - [`TokioScheduler`]: the scheduler port backed by `tokio::time::sleep` tasks
//! - [`MatchSession`]: a single-owner loop that serialises pick intents and timer callbacks
//!   through one engine, broadcasts its events and records finished games in the ledger
//! - [`spawn_ledger_refresh`]: coarse polling backstop so views notice records written by
//!   another process
//!
//! All of these must be used from within a tokio runtime.

pub mod scheduler;
pub mod session;

pub use askeladd_core as core;
pub use askeladd_store as store;
pub use askeladd_types as types;

pub use scheduler::TokioScheduler;
pub use session::{spawn_ledger_refresh, Intent, MatchSession, SessionHandle};
