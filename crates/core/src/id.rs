//! Strongly-typed identifiers used across the domain.
//!
//! Identifiers are creation-time integers derived from the millisecond clock,
//! matching the persisted wire format (plain JSON numbers). Uniqueness within
//! one process is guaranteed by [`IdGen`]; monotonicity across wall-clock
//! changes is not.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Identifier of a customer record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(i64);

/// Identifier of a single ledger transaction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransactionId(i64);

/// Identifier of an inventory item.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(i64);

macro_rules! impl_clock_id {
    ($t:ty) => {
        impl $t {
            pub fn from_raw(raw: i64) -> Self {
                Self(raw)
            }

            pub fn as_raw(&self) -> i64 {
                self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $t {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$t> for i64 {
            fn from(value: $t) -> Self {
                value.0
            }
        }
    };
}

impl_clock_id!(CustomerId);
impl_clock_id!(TransactionId);
impl_clock_id!(ItemId);

/// Clock-derived id allocator.
///
/// Issues the current millisecond timestamp, bumped past the last issued (or
/// persisted) id when the clock has not advanced. Two allocations in the same
/// millisecond therefore never collide.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdGen {
    last: i64,
}

impl IdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure future ids are issued strictly after `raw`.
    ///
    /// Called when rehydrating state so fresh ids never collide with
    /// persisted ones.
    pub fn observe(&mut self, raw: i64) {
        if raw > self.last {
            self.last = raw;
        }
    }

    fn next_raw(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last = if now > self.last { now } else { self.last + 1 };
        self.last
    }

    pub fn next_customer_id(&mut self) -> CustomerId {
        CustomerId(self.next_raw())
    }

    pub fn next_transaction_id(&mut self) -> TransactionId {
        TransactionId(self.next_raw())
    }

    pub fn next_item_id(&mut self) -> ItemId {
        ItemId(self.next_raw())
    }
}
