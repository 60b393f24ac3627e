//! Monetary wrappers.

use rust_decimal::Decimal;
use wrapper_value_object_derive::wrapper_value_object;

/// An amount of money in the ledger currency.
#[wrapper_value_object(Decimal)]
#[derive(Clone, Copy)]
pub struct Money;

impl Money {
    pub fn zero() -> Self {
        Self::new(Decimal::ZERO)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("amount must be positive, got {0}")]
    NotPositive(i64),
}

/// A strictly positive amount in minor units.
///
/// `new` returns `Result<Self, ValidationError>`, and so does every operator
/// that produces a new amount.
#[wrapper_value_object(i64)]
#[derive(Clone, Copy)]
pub struct PositiveAmount;

impl PositiveAmount {
    fn validate(value: &i64) -> Result<(), ValidationError> {
        if *value > 0 {
            Ok(())
        } else {
            Err(ValidationError::NotPositive(*value))
        }
    }
}
