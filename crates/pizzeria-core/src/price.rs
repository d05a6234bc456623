//! The price rule for restaurant pizzas
//!
//! [`validate_price`] is the single implementation of the rule. The HTTP
//! handler runs it on the raw request value and every storage backend runs
//! it again on its create path, so both layers always agree.

use std::num::IntErrorKind;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lowest accepted price
pub const MIN_PRICE: i64 = 1;

/// Highest accepted price
pub const MAX_PRICE: i64 = 30;

/// Which part of the price rule a value violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceError {
    Missing,
    NotInteger,
    OutOfRange,
}

impl std::fmt::Display for PriceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Missing => write!(f, "Price is required"),
            Self::NotInteger => write!(f, "Price must be an integer"),
            Self::OutOfRange => {
                write!(f, "Price must be between {} and {}", MIN_PRICE, MAX_PRICE)
            }
        }
    }
}

impl std::error::Error for PriceError {}

/// A price known to satisfy `MIN_PRICE <= price <= MAX_PRICE`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Price(i64);

impl Price {
    pub fn new(value: i64) -> Result<Self, PriceError> {
        if !(MIN_PRICE..=MAX_PRICE).contains(&value) {
            return Err(PriceError::OutOfRange);
        }
        Ok(Self(value))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for Price {
    type Error = PriceError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Price> for i64 {
    fn from(price: Price) -> Self {
        price.0
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validate a raw price value.
///
/// Integers, floats without a fractional part and strings holding an
/// integer are accepted. Booleans convert to 0 and 1. `None` and `null`
/// count as missing.
pub fn validate_price(value: Option<&Value>) -> Result<Price, PriceError> {
    let value = match value {
        None | Some(Value::Null) => return Err(PriceError::Missing),
        Some(v) => v,
    };

    let integer = match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i
            } else if n.is_u64() {
                // Larger than i64::MAX, so certainly out of range
                return Err(PriceError::OutOfRange);
            } else {
                let f = n.as_f64().ok_or(PriceError::NotInteger)?;
                if !f.is_finite() || f.fract() != 0.0 {
                    return Err(PriceError::NotInteger);
                }
                if f < MIN_PRICE as f64 || f > MAX_PRICE as f64 {
                    return Err(PriceError::OutOfRange);
                }
                f as i64
            }
        }
        Value::String(s) => match s.trim().parse::<i64>() {
            Ok(i) => i,
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    return Err(PriceError::OutOfRange)
                }
                _ => return Err(PriceError::NotInteger),
            },
        },
        Value::Bool(b) => i64::from(*b),
        _ => return Err(PriceError::NotInteger),
    };

    Price::new(integer)
}
