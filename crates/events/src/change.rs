//! Change events broadcast after successful engine mutations.

use khata_core::CustomerId;
use serde::{Deserialize, Serialize};

/// What changed, at the granularity the presentation layer cares about.
///
/// Consumers re-read state from the engine on receipt; events carry ids, not
/// payloads, so there is exactly one source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeEvent {
    /// A customer was created or deleted, or the customer list changed shape.
    CustomerListChanged,
    /// A customer's transactions or balance changed.
    CustomerChanged(CustomerId),
    /// The user profile was updated.
    ProfileUpdated,
}
