use chrono::NaiveDate;
use khata_core::{Amount, TransactionId};
use serde::{Deserialize, Serialize};

/// Which side of the ledger a movement lands on.
///
/// `Given` ("maine diye"): the shop handed out value, increasing what it is
/// owed. `Received` ("maine liye"): the shop took in value, decreasing it.
/// This is deliberately the reverse of cash-accounting sign intuition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Given,
    Received,
}

/// One single-direction movement on a customer account.
///
/// Invariant: exactly one of `given`/`received` is non-zero. Construction
/// through [`Transaction::new`] makes the other side impossible to set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(with = "display_date")]
    pub date: NaiveDate,
    #[serde(rename = "maineDiye")]
    pub given: f64,
    #[serde(rename = "maineLiye")]
    pub received: f64,
    #[serde(rename = "tafseel", default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Transaction {
    pub fn new(
        id: TransactionId,
        date: NaiveDate,
        kind: EntryKind,
        amount: Amount,
        note: Option<String>,
    ) -> Self {
        let (given, received) = match kind {
            EntryKind::Given => (amount.get(), 0.0),
            EntryKind::Received => (0.0, amount.get()),
        };

        // Blank annotations are stored as absent, matching the wire format.
        let note = note.filter(|n| !n.trim().is_empty());

        Self {
            id,
            date,
            given,
            received,
            note,
        }
    }

    /// Signed contribution to the customer's net position.
    pub fn signed(&self) -> f64 {
        self.given - self.received
    }
}

/// Dates on the wire use the original display format, e.g. `"Jan 5, 2026"`.
mod display_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    const FORMAT_OUT: &str = "%b %-d, %Y";
    const FORMAT_IN: &str = "%b %d, %Y";

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT_OUT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT_IN).map_err(D::Error::custom)
    }
}
