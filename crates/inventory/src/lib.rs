//! Inventory domain module.
//!
//! A simple shop item list: name, asking price, sold/available status.
//! Pure in-memory domain logic, session-scoped (the item list is not part of
//! the persisted ledger state).

pub mod item;

pub use item::{Inventory, Item, ItemStatus};
