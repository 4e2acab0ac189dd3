use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;

use khata_core::{Amount, CustomerId};
use khata_events::{ChangeBus, ChangeEvent, InProcessBus, Subscription};
use khata_inventory::Inventory;
use khata_ledger::{Customer, EntryKind, Ledger, NetSummary, Statement, Totals, Transaction};
use khata_store::KeyValueStore;

use crate::profile::Profile;

/// Persisted key holding the serialized customer array.
pub const CUSTOMERS_KEY: &str = "khata_customers";
/// Persisted key holding the serialized customer-id -> transactions map.
pub const TRANSACTIONS_KEY: &str = "khata_transactions";
/// Persisted key holding the serialized shopkeeper profile.
pub const PROFILE_KEY: &str = "user_profile";

/// The application engine: ledger + injected store + change bus.
///
/// Constructed once per session. Single writer, single reader, UI-event
/// driven: every operation runs to completion before the next begins, and
/// each mutation is followed by a synchronous full-state write-through.
///
/// Validation rejections never surface past this boundary: an invalid input
/// leaves every collection untouched and is reported only by the return
/// value (and a debug log line).
pub struct Khata {
    ledger: Ledger,
    inventory: Inventory,
    profile: Profile,
    store: Box<dyn KeyValueStore>,
    bus: InProcessBus<ChangeEvent>,
}

impl Khata {
    /// Load a session from the store.
    ///
    /// Absence or corruption of any persisted key means starting from empty
    /// state for that key, never an error.
    pub fn open(store: Box<dyn KeyValueStore>) -> Self {
        let customers: Vec<Customer> = load_json(store.as_ref(), CUSTOMERS_KEY);
        let transactions = load_json(store.as_ref(), TRANSACTIONS_KEY);
        let profile: Profile = load_json(store.as_ref(), PROFILE_KEY);

        Self {
            ledger: Ledger::from_parts(customers, transactions),
            inventory: Inventory::new(),
            profile,
            store,
            bus: InProcessBus::new(),
        }
    }

    /// Register an observer for change notifications.
    pub fn subscribe(&self) -> Subscription<ChangeEvent> {
        self.bus.subscribe()
    }

    // Ledger mutations -----------------------------------------------------

    /// Create a customer. Returns its id, or `None` on validation rejection.
    pub fn create_customer(&mut self, name: &str) -> Option<CustomerId> {
        match self.ledger.create_customer(name) {
            Ok(customer) => {
                let id = customer.id;
                self.persist_ledger();
                self.bus.publish(ChangeEvent::CustomerListChanged);
                Some(id)
            }
            Err(err) => {
                tracing::debug!(%err, "create_customer rejected");
                None
            }
        }
    }

    /// Delete customers and their histories. Empty set is a no-op.
    pub fn delete_customers(&mut self, ids: &HashSet<CustomerId>) {
        if ids.is_empty() {
            return;
        }
        self.ledger.delete_customers(ids);
        self.persist_ledger();
        self.bus.publish(ChangeEvent::CustomerListChanged);
    }

    /// Record a movement on a customer account.
    ///
    /// Returns whether the transaction was applied. The amount has already
    /// been through [`Amount`]'s parse-and-validate step, so the only
    /// rejection left is an unknown customer.
    pub fn record_transaction(
        &mut self,
        customer_id: CustomerId,
        kind: EntryKind,
        amount: Amount,
        date: NaiveDate,
        note: Option<String>,
    ) -> bool {
        match self
            .ledger
            .record_transaction(customer_id, kind, amount, date, note)
        {
            Ok(_) => {
                self.persist_ledger();
                self.bus.publish(ChangeEvent::CustomerChanged(customer_id));
                true
            }
            Err(err) => {
                tracing::debug!(%customer_id, %err, "record_transaction rejected");
                false
            }
        }
    }

    /// Clear a customer's history and reset its stored position.
    pub fn clear_transactions(&mut self, customer_id: CustomerId) -> bool {
        match self.ledger.clear_transactions(customer_id) {
            Ok(()) => {
                self.persist_ledger();
                self.bus.publish(ChangeEvent::CustomerChanged(customer_id));
                true
            }
            Err(err) => {
                tracing::debug!(%customer_id, %err, "clear_transactions rejected");
                false
            }
        }
    }

    // Profile --------------------------------------------------------------

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Replace the profile, write it through and notify subscribers.
    pub fn update_profile(&mut self, profile: Profile) {
        self.profile = profile;
        let profile = self.profile.clone();
        self.persist(PROFILE_KEY, &profile);
        self.bus.publish(ChangeEvent::ProfileUpdated);
    }

    // Inventory ------------------------------------------------------------

    /// The session-scoped item list (not persisted).
    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn inventory_mut(&mut self) -> &mut Inventory {
        &mut self.inventory
    }

    // Reads ----------------------------------------------------------------

    pub fn customers(&self) -> &[Customer] {
        self.ledger.customers()
    }

    pub fn customer(&self, customer_id: CustomerId) -> Option<&Customer> {
        self.ledger.customer(customer_id)
    }

    pub fn search_customers<'a>(&'a self, query: &str) -> Vec<&'a Customer> {
        self.ledger.search(query)
    }

    pub fn transactions(&self, customer_id: CustomerId) -> Option<&[Transaction]> {
        self.ledger.transactions(customer_id)
    }

    pub fn net_summary(&self, customer_id: CustomerId) -> Option<NetSummary> {
        self.ledger.net_summary(customer_id)
    }

    pub fn totals(&self) -> Totals {
        self.ledger.totals()
    }

    /// Export payload for the document renderer.
    pub fn statement(&self, customer_id: CustomerId) -> Option<Statement> {
        self.ledger.statement(customer_id)
    }

    /// The backing store (read access, mainly for tests).
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }

    // Persistence ----------------------------------------------------------

    /// Full-state write-through of both ledger keys.
    fn persist_ledger(&mut self) {
        let customers = self.ledger.customers().to_vec();
        let transactions = self.ledger.transaction_map().clone();
        self.persist(CUSTOMERS_KEY, &customers);
        self.persist(TRANSACTIONS_KEY, &transactions);
    }

    /// Write one key. Failures are logged and swallowed: the in-memory state
    /// stays ahead of the store until the next successful write.
    fn persist(&mut self, key: &str, value: &impl Serialize) {
        match serde_json::to_string(value) {
            Ok(raw) => {
                if let Err(err) = self.store.set(key, &raw) {
                    tracing::error!(key, %err, "persistence write failed");
                }
            }
            Err(err) => {
                tracing::error!(key, %err, "failed to serialize state for persistence");
            }
        }
    }
}

/// Read and parse one persisted value; absence or corruption means default.
fn load_json<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, key: &str) -> T {
    match store.get(key) {
        None => T::default(),
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, %err, "corrupt persisted value, treating as empty");
                T::default()
            }
        },
    }
}
