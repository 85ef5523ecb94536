//! Askeladd's Trials (workspace facade crate).
//!
//! Re-exports the match engine crates as `askeladd::{types, core, store, runtime}` so hosts and
//! the integration tests depend on a single package while the implementation lives in dedicated
//! crates under `crates/`.

pub use askeladd_core as core;
pub use askeladd_runtime as runtime;
pub use askeladd_store as store;
pub use askeladd_types as types;
