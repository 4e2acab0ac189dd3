use khata_core::CustomerId;
use serde::{Deserialize, Serialize};

/// Which way the net position points.
///
/// `Receivable` ("lene"): the shop is owed money by the customer.
/// `Payable` ("dene"): the shop owes money to the customer.
///
/// The wire names are fixed by the persisted format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[serde(rename = "lene")]
    Receivable,
    #[serde(rename = "dene")]
    Payable,
}

/// A customer account with its stored running position.
///
/// `balance` and `direction` are derived from the transaction history on
/// every mutation, never set independently of it — except by the explicit
/// clear-all reset to `(0, Receivable)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    /// Non-negative magnitude of the net position.
    pub balance: f64,
    /// Folds net = 0 into `Receivable` (two-state stored convention).
    #[serde(rename = "type")]
    pub direction: Direction,
}

impl Customer {
    /// Fresh account: zero balance, receivable by convention.
    pub fn new(id: CustomerId, name: String) -> Self {
        Self {
            id,
            name,
            balance: 0.0,
            direction: Direction::Receivable,
        }
    }

    /// Apply a recomputed signed net position to the stored fields.
    ///
    /// Stored convention is two-way: `net >= 0` is receivable, `net < 0`
    /// payable. The tie-break at zero is normative; display logic that needs
    /// a three-way answer recomputes via [`crate::NetSummary`] instead.
    pub fn set_net(&mut self, net: f64) {
        self.balance = net.abs();
        self.direction = if net >= 0.0 {
            Direction::Receivable
        } else {
            Direction::Payable
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_uses_wire_names() {
        assert_eq!(
            serde_json::to_string(&Direction::Receivable).unwrap(),
            "\"lene\""
        );
        assert_eq!(serde_json::to_string(&Direction::Payable).unwrap(), "\"dene\"");
    }

    #[test]
    fn customer_serializes_with_type_field() {
        let customer = Customer::new(CustomerId::from_raw(42), "Ali".to_string());
        let json = serde_json::to_value(&customer).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"id": 42, "name": "Ali", "balance": 0.0, "type": "lene"})
        );
    }

    #[test]
    fn set_net_folds_zero_into_receivable() {
        let mut customer = Customer::new(CustomerId::from_raw(1), "Ali".to_string());

        customer.set_net(-250.0);
        assert_eq!(customer.balance, 250.0);
        assert_eq!(customer.direction, Direction::Payable);

        customer.set_net(0.0);
        assert_eq!(customer.balance, 0.0);
        assert_eq!(customer.direction, Direction::Receivable);
    }
}
