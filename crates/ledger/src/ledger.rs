use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use khata_core::{Amount, CustomerId, DomainError, DomainResult, IdGen};

use crate::customer::{Customer, Direction};
use crate::transaction::{EntryKind, Transaction};

/// Three-way classification of a recomputed net position.
///
/// Subtly stricter than the stored two-state [`Direction`]: a settled account
/// (`net = 0`) is `Clear` here but `Receivable` in the stored field. UI
/// surfaces depend on the distinction ("Balance Clear" has no analog in the
/// stored field), so both codepaths exist on purpose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Settlement {
    /// net > 0: the shop is owed money.
    Receivable,
    /// net < 0: the shop owes money.
    Payable,
    /// net = 0: nothing outstanding either way.
    Clear,
}

impl Settlement {
    fn classify(net: f64) -> Self {
        if net > 0.0 {
            Self::Receivable
        } else if net < 0.0 {
            Self::Payable
        } else {
            Self::Clear
        }
    }
}

/// Read-only derivation over a customer's transaction sequence.
///
/// Recomputed from history on every call, independent of the stored
/// `balance`/`direction` fields; the two must always agree on magnitude.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetSummary {
    pub total_given: f64,
    pub total_received: f64,
    /// Signed running total: `total_given - total_received`.
    pub net: f64,
    pub settlement: Settlement,
}

impl NetSummary {
    fn compute(transactions: &[Transaction]) -> Self {
        let total_given: f64 = transactions.iter().map(|t| t.given).sum();
        let total_received: f64 = transactions.iter().map(|t| t.received).sum();
        let net = total_given - total_received;

        Self {
            total_given,
            total_received,
            net,
            settlement: Settlement::classify(net),
        }
    }

    /// Magnitude shown to the user.
    pub fn display_balance(&self) -> f64 {
        self.net.abs()
    }
}

/// Ledger-wide position totals, recomputed on every read.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Totals {
    /// Sum of balances over customers currently receivable.
    pub receivable: f64,
    /// Sum of balances over customers currently payable.
    pub payable: f64,
}

/// Everything the document renderer needs for one customer's statement.
///
/// The ledger supplies the data; formatting is someone else's job.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub customer_name: String,
    pub display_balance: f64,
    pub settlement: Settlement,
    pub transactions: Vec<Transaction>,
}

/// The aggregate of all customers and their transaction histories.
///
/// Customers keep insertion order (stable for display, never re-sorted);
/// each customer's transactions are kept newest-first. Invariant: the two
/// collections always cover exactly the same set of customer ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Ledger {
    customers: Vec<Customer>,
    transactions: BTreeMap<CustomerId, Vec<Transaction>>,
    ids: IdGen,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from persisted collections, repairing the cross-collection
    /// invariant: customers without a history get an empty one, histories
    /// without a customer are dropped. The id allocator is seeded past every
    /// persisted id so fresh records never collide.
    pub fn from_parts(
        customers: Vec<Customer>,
        mut transactions: BTreeMap<CustomerId, Vec<Transaction>>,
    ) -> Self {
        let live: HashSet<CustomerId> = customers.iter().map(|c| c.id).collect();
        transactions.retain(|id, _| live.contains(id));

        let mut ids = IdGen::new();
        for customer in &customers {
            ids.observe(customer.id.as_raw());
            transactions.entry(customer.id).or_default();
        }
        for tx in transactions.values().flatten() {
            ids.observe(tx.id.as_raw());
        }

        Self {
            customers,
            transactions,
            ids,
        }
    }

    /// Create a customer with a fresh id, zero balance and empty history.
    ///
    /// Empty or whitespace-only names are rejected.
    pub fn create_customer(&mut self, name: &str) -> DomainResult<&Customer> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::validation("customer name cannot be empty"));
        }

        let id = self.ids.next_customer_id();
        self.customers.push(Customer::new(id, name.to_string()));
        self.transactions.insert(id, Vec::new());

        Ok(self.customers.last().expect("just pushed"))
    }

    /// Remove the given customers and their histories entirely.
    ///
    /// Unconditional: transactions are owned exclusively by the customer
    /// being removed, so there are no dependent-record checks. An empty or
    /// unmatched set is a no-op.
    pub fn delete_customers(&mut self, ids: &HashSet<CustomerId>) {
        if ids.is_empty() {
            return;
        }
        self.customers.retain(|c| !ids.contains(&c.id));
        self.transactions.retain(|id, _| !ids.contains(id));
    }

    /// Record one single-direction movement and rederive the stored position.
    ///
    /// The new transaction is prepended (newest first), then the signed net
    /// is recomputed over the whole history and folded into the stored
    /// `balance`/`direction` pair.
    pub fn record_transaction(
        &mut self,
        customer_id: CustomerId,
        kind: EntryKind,
        amount: Amount,
        date: NaiveDate,
        note: Option<String>,
    ) -> DomainResult<&Customer> {
        let history = self
            .transactions
            .get_mut(&customer_id)
            .ok_or(DomainError::NotFound)?;

        let tx = Transaction::new(self.ids.next_transaction_id(), date, kind, amount, note);
        history.insert(0, tx);

        // Shared with net_summary so the stored fields and the recomputed
        // summary can never drift, even in the last float digit.
        let net = NetSummary::compute(history).net;

        let customer = self
            .customers
            .iter_mut()
            .find(|c| c.id == customer_id)
            .ok_or_else(|| DomainError::invariant("history without customer record"))?;
        customer.set_net(net);

        Ok(customer)
    }

    /// Hard reset of one account: empty history, `(0, Receivable)`.
    ///
    /// Not a recomputation — after clearing there is no history to recompute
    /// from, and the receivable reset is the defined convention.
    pub fn clear_transactions(&mut self, customer_id: CustomerId) -> DomainResult<()> {
        let history = self
            .transactions
            .get_mut(&customer_id)
            .ok_or(DomainError::NotFound)?;
        history.clear();

        let customer = self
            .customers
            .iter_mut()
            .find(|c| c.id == customer_id)
            .ok_or_else(|| DomainError::invariant("history without customer record"))?;
        customer.balance = 0.0;
        customer.direction = Direction::Receivable;

        Ok(())
    }

    /// Recompute the three-way net summary for a customer.
    pub fn net_summary(&self, customer_id: CustomerId) -> Option<NetSummary> {
        self.transactions
            .get(&customer_id)
            .map(|history| NetSummary::compute(history))
    }

    /// Ledger-wide receivable/payable totals over the stored balances.
    pub fn totals(&self) -> Totals {
        self.customers
            .iter()
            .fold(Totals::default(), |mut acc, c| {
                match c.direction {
                    Direction::Receivable => acc.receivable += c.balance,
                    Direction::Payable => acc.payable += c.balance,
                }
                acc
            })
    }

    /// All customers in insertion order.
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn customer(&self, customer_id: CustomerId) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == customer_id)
    }

    /// Case-insensitive substring filter over customer names.
    pub fn search<'a>(&'a self, query: &str) -> Vec<&'a Customer> {
        let needle = query.to_lowercase();
        self.customers
            .iter()
            .filter(|c| c.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// A customer's transactions, newest first.
    pub fn transactions(&self, customer_id: CustomerId) -> Option<&[Transaction]> {
        self.transactions.get(&customer_id).map(Vec::as_slice)
    }

    /// Everything stored, for full-state serialization.
    pub fn transaction_map(&self) -> &BTreeMap<CustomerId, Vec<Transaction>> {
        &self.transactions
    }

    /// Export payload for one customer, driven by the recomputed summary.
    pub fn statement(&self, customer_id: CustomerId) -> Option<Statement> {
        let customer = self.customer(customer_id)?;
        let history = self.transactions.get(&customer_id)?;
        let summary = NetSummary::compute(history);

        Some(Statement {
            customer_name: customer.name.clone(),
            display_balance: summary.display_balance(),
            settlement: summary.settlement,
            transactions: history.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn test_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
    }

    fn amount(v: f64) -> Amount {
        Amount::new(v).unwrap()
    }

    fn ledger_with(name: &str) -> (Ledger, CustomerId) {
        let mut ledger = Ledger::new();
        let id = ledger.create_customer(name).unwrap().id;
        (ledger, id)
    }

    #[test]
    fn create_customer_starts_clear_and_receivable() {
        let (ledger, id) = ledger_with("Ali");

        let customer = ledger.customer(id).unwrap();
        assert_eq!(customer.name, "Ali");
        assert_eq!(customer.balance, 0.0);
        assert_eq!(customer.direction, Direction::Receivable);
        assert_eq!(ledger.transactions(id).unwrap().len(), 0);
    }

    #[test]
    fn create_customer_trims_and_rejects_blank_names() {
        let mut ledger = Ledger::new();

        assert!(ledger.create_customer("").unwrap_err().is_validation());
        assert!(ledger.create_customer("   ").unwrap_err().is_validation());
        assert_eq!(ledger.customers().len(), 0);

        let customer = ledger.create_customer("  Bilal  ").unwrap();
        assert_eq!(customer.name, "Bilal");
    }

    #[test]
    fn customers_keep_insertion_order() {
        let mut ledger = Ledger::new();
        ledger.create_customer("Zara").unwrap();
        ledger.create_customer("Ali").unwrap();
        ledger.create_customer("Bilal").unwrap();

        let names: Vec<&str> = ledger.customers().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Zara", "Ali", "Bilal"]);
    }

    #[test]
    fn given_increases_the_receivable_position() {
        let (mut ledger, id) = ledger_with("Ali");

        let customer = ledger
            .record_transaction(id, EntryKind::Given, amount(500.0), test_date(), None)
            .unwrap();
        assert_eq!(customer.balance, 500.0);
        assert_eq!(customer.direction, Direction::Receivable);

        let summary = ledger.net_summary(id).unwrap();
        assert_eq!(summary.net, 500.0);
        assert_eq!(summary.settlement, Settlement::Receivable);
        assert_eq!(summary.display_balance(), 500.0);
    }

    #[test]
    fn received_beyond_given_flips_to_payable() {
        let (mut ledger, id) = ledger_with("Ali");

        ledger
            .record_transaction(id, EntryKind::Received, amount(300.0), test_date(), None)
            .unwrap();

        let customer = ledger.customer(id).unwrap();
        assert_eq!(customer.balance, 300.0);
        assert_eq!(customer.direction, Direction::Payable);
        assert_eq!(ledger.net_summary(id).unwrap().settlement, Settlement::Payable);
    }

    #[test]
    fn cancellation_to_zero_is_clear_but_stored_receivable() {
        let (mut ledger, id) = ledger_with("Ali");

        ledger
            .record_transaction(id, EntryKind::Given, amount(100.0), test_date(), None)
            .unwrap();
        ledger
            .record_transaction(id, EntryKind::Received, amount(100.0), test_date(), None)
            .unwrap();

        let summary = ledger.net_summary(id).unwrap();
        assert_eq!(summary.net, 0.0);
        assert_eq!(summary.settlement, Settlement::Clear);
        assert_eq!(summary.display_balance(), 0.0);

        // Stored field folds zero into receivable.
        let customer = ledger.customer(id).unwrap();
        assert_eq!(customer.balance, 0.0);
        assert_eq!(customer.direction, Direction::Receivable);
    }

    #[test]
    fn transactions_are_newest_first() {
        let (mut ledger, id) = ledger_with("Ali");

        ledger
            .record_transaction(id, EntryKind::Given, amount(1.0), test_date(), Some("first".into()))
            .unwrap();
        ledger
            .record_transaction(id, EntryKind::Given, amount(2.0), test_date(), Some("second".into()))
            .unwrap();

        let history = ledger.transactions(id).unwrap();
        assert_eq!(history[0].note.as_deref(), Some("second"));
        assert_eq!(history[1].note.as_deref(), Some("first"));
    }

    #[test]
    fn record_transaction_requires_existing_customer() {
        let mut ledger = Ledger::new();
        let err = ledger
            .record_transaction(
                CustomerId::from_raw(404),
                EntryKind::Given,
                amount(10.0),
                test_date(),
                None,
            )
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn clear_transactions_resets_fully() {
        let (mut ledger, id) = ledger_with("Ali");
        ledger
            .record_transaction(id, EntryKind::Received, amount(750.0), test_date(), None)
            .unwrap();
        assert_eq!(ledger.customer(id).unwrap().direction, Direction::Payable);

        ledger.clear_transactions(id).unwrap();

        assert_eq!(ledger.transactions(id).unwrap().len(), 0);
        let customer = ledger.customer(id).unwrap();
        assert_eq!(customer.balance, 0.0);
        assert_eq!(customer.direction, Direction::Receivable);
        assert_eq!(ledger.net_summary(id).unwrap().settlement, Settlement::Clear);
    }

    #[test]
    fn deletion_is_total() {
        let mut ledger = Ledger::new();
        let keep = ledger.create_customer("Keep").unwrap().id;
        let gone = ledger.create_customer("Gone").unwrap().id;
        ledger
            .record_transaction(gone, EntryKind::Given, amount(50.0), test_date(), None)
            .unwrap();

        ledger.delete_customers(&HashSet::from([gone]));

        assert!(ledger.customer(gone).is_none());
        assert!(ledger.transactions(gone).is_none());
        assert!(ledger.customer(keep).is_some());

        // Empty set is a no-op.
        let before = ledger.clone();
        ledger.delete_customers(&HashSet::new());
        assert_eq!(ledger, before);
    }

    #[test]
    fn totals_split_by_stored_direction() {
        let mut ledger = Ledger::new();
        let a = ledger.create_customer("A").unwrap().id;
        let b = ledger.create_customer("B").unwrap().id;
        let c = ledger.create_customer("C").unwrap().id;

        ledger
            .record_transaction(a, EntryKind::Given, amount(300.0), test_date(), None)
            .unwrap();
        ledger
            .record_transaction(b, EntryKind::Given, amount(200.0), test_date(), None)
            .unwrap();
        ledger
            .record_transaction(c, EntryKind::Received, amount(150.0), test_date(), None)
            .unwrap();

        let totals = ledger.totals();
        assert_eq!(totals.receivable, 500.0);
        assert_eq!(totals.payable, 150.0);
    }

    #[test]
    fn search_is_case_insensitive_substring() {
        let mut ledger = Ledger::new();
        ledger.create_customer("Ali Raza").unwrap();
        ledger.create_customer("Salman").unwrap();
        ledger.create_customer("Kashif").unwrap();

        let hits: Vec<&str> = ledger.search("AL").iter().map(|c| c.name.as_str()).collect();
        assert_eq!(hits, ["Ali Raza", "Salman"]);
        assert!(ledger.search("xyz").is_empty());
    }

    #[test]
    fn statement_uses_recomputed_summary() {
        let (mut ledger, id) = ledger_with("Ali");
        ledger
            .record_transaction(id, EntryKind::Given, amount(500.0), test_date(), None)
            .unwrap();
        ledger
            .record_transaction(id, EntryKind::Received, amount(500.0), test_date(), None)
            .unwrap();

        let statement = ledger.statement(id).unwrap();
        assert_eq!(statement.customer_name, "Ali");
        assert_eq!(statement.display_balance, 0.0);
        assert_eq!(statement.settlement, Settlement::Clear);
        assert_eq!(statement.transactions.len(), 2);
    }

    #[test]
    fn from_parts_repairs_cross_collection_invariant() {
        let customer = Customer::new(CustomerId::from_raw(10), "Ali".to_string());
        let orphan = CustomerId::from_raw(99);
        let mut transactions = BTreeMap::new();
        transactions.insert(
            orphan,
            vec![Transaction::new(
                khata_core::TransactionId::from_raw(1),
                test_date(),
                EntryKind::Given,
                amount(5.0),
                None,
            )],
        );

        let ledger = Ledger::from_parts(vec![customer], transactions);

        // Customer without a history gets an empty one; orphaned history is gone.
        assert_eq!(ledger.transactions(CustomerId::from_raw(10)).unwrap().len(), 0);
        assert!(ledger.transactions(orphan).is_none());
    }

    #[test]
    fn from_parts_seeds_ids_past_persisted_ones() {
        let far_future = chrono::Utc::now().timestamp_millis() + 1_000_000;
        let customer = Customer::new(CustomerId::from_raw(far_future), "Ali".to_string());
        let mut ledger = Ledger::from_parts(vec![customer], BTreeMap::new());

        let fresh = ledger.create_customer("Bilal").unwrap().id;
        assert!(fresh.as_raw() > far_future);
    }

    #[test]
    fn end_to_end_ali_scenario() {
        let (mut ledger, id) = ledger_with("Ali");

        ledger
            .record_transaction(id, EntryKind::Given, amount(500.0), test_date(), None)
            .unwrap();
        ledger
            .record_transaction(id, EntryKind::Received, amount(200.0), test_date(), None)
            .unwrap();

        let summary = ledger.net_summary(id).unwrap();
        assert_eq!(summary.net, 300.0);
        assert_eq!(summary.settlement, Settlement::Receivable);
        assert_eq!(summary.display_balance(), 300.0);
        let customer = ledger.customer(id).unwrap();
        assert_eq!(customer.balance, 300.0);
        assert_eq!(customer.direction, Direction::Receivable);

        ledger
            .record_transaction(id, EntryKind::Received, amount(300.0), test_date(), None)
            .unwrap();

        let summary = ledger.net_summary(id).unwrap();
        assert_eq!(summary.net, 0.0);
        assert_eq!(summary.settlement, Settlement::Clear);
        let customer = ledger.customer(id).unwrap();
        assert_eq!(customer.balance, 0.0);
        assert_eq!(customer.direction, Direction::Receivable);
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: after any sequence of recorded transactions, the stored
        /// fields agree with the recomputed summary: `balance = |net|` and
        /// the stored direction follows the `net >= 0 -> receivable` rule.
        #[test]
        fn stored_fields_agree_with_recomputed_net(
            moves in prop::collection::vec((any::<bool>(), 1u32..1_000_000u32), 0..40)
        ) {
            let (mut ledger, id) = ledger_with("Ali");

            for (is_given, units) in moves {
                let kind = if is_given { EntryKind::Given } else { EntryKind::Received };
                ledger
                    .record_transaction(id, kind, amount(units as f64), test_date(), None)
                    .unwrap();
            }

            let summary = ledger.net_summary(id).unwrap();
            let customer = ledger.customer(id).unwrap();

            prop_assert_eq!(customer.balance, summary.net.abs());
            let expected = if summary.net >= 0.0 {
                Direction::Receivable
            } else {
                Direction::Payable
            };
            prop_assert_eq!(customer.direction, expected);

            // Only-given histories sum exactly to the receivable total.
            prop_assert_eq!(summary.net, summary.total_given - summary.total_received);
        }
    }
}
