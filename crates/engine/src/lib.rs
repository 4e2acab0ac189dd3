//! Khata application engine.
//!
//! Ties the pure ledger domain to a persisted key-value store and an
//! in-process change bus. One [`Khata`] is constructed per session with an
//! injected store; every mutation is applied in memory, written through in
//! full, and announced to subscribers.

pub mod engine;
pub mod profile;

pub use engine::{CUSTOMERS_KEY, Khata, PROFILE_KEY, TRANSACTIONS_KEY};
pub use profile::Profile;
