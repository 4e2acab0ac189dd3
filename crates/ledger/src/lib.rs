//! Ledger domain module.
//!
//! This crate contains the balance computation and sign-convention rules for
//! customer accounts, implemented purely as deterministic domain logic
//! (no IO, no persistence, no rendering).

pub mod customer;
pub mod ledger;
pub mod transaction;

pub use customer::{Customer, Direction};
pub use ledger::{Ledger, NetSummary, Settlement, Statement, Totals};
pub use transaction::{EntryKind, Transaction};
