//! In-process change notification.
//!
//! The ledger is single-writer and single-process; the only cross-component
//! signaling it needs is "something changed, re-read". This crate provides
//! explicit observer registration for that, instead of an ambient broadcast:
//! presentation layers subscribe once and receive [`ChangeEvent`]s after every
//! successful mutation.

pub mod bus;
pub mod change;

pub use bus::{ChangeBus, InProcessBus, Subscription};
pub use change::ChangeEvent;
