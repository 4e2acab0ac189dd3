//! Validated transaction amount.
//!
//! Form input arrives as free text; instead of coercing ad hoc at each call
//! site, parsing and validation happen once here and every engine operation
//! takes an already-checked [`Amount`].

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A positive, finite monetary amount.
///
/// Invariant: the wrapped value is finite and strictly greater than zero.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(f64);

impl Amount {
    /// Validate a raw number as an amount.
    ///
    /// Rejects NaN, infinities, zero and negatives.
    pub fn new(value: f64) -> DomainResult<Self> {
        if !value.is_finite() {
            return Err(DomainError::validation("amount must be a finite number"));
        }
        if value <= 0.0 {
            return Err(DomainError::validation("amount must be positive"));
        }
        Ok(Self(value))
    }

    /// Parse a human-entered amount field.
    ///
    /// Blank input is a validation rejection like any other, so the caller
    /// can treat it as "do nothing".
    pub fn parse(input: &str) -> DomainResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("amount is empty"));
        }
        let value: f64 = trimmed
            .parse()
            .map_err(|_| DomainError::validation(format!("amount is not a number: {trimmed:?}")))?;
        Self::new(value)
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl core::fmt::Display for Amount {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_positive_finite_values() {
        assert_eq!(Amount::new(500.0).unwrap().get(), 500.0);
        assert_eq!(Amount::parse(" 499.5 ").unwrap().get(), 499.5);
    }

    #[test]
    fn rejects_non_positive_values() {
        assert!(Amount::new(0.0).unwrap_err().is_validation());
        assert!(Amount::new(-5.0).unwrap_err().is_validation());
    }

    #[test]
    fn rejects_non_numeric_input() {
        assert!(Amount::parse("").unwrap_err().is_validation());
        assert!(Amount::parse("abc").unwrap_err().is_validation());
        assert!(Amount::new(f64::NAN).unwrap_err().is_validation());
        assert!(Amount::new(f64::INFINITY).unwrap_err().is_validation());
    }
}
