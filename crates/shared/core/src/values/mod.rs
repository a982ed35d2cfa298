use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Price value - uses Decimal for precision
pub type Price = Decimal;

/// Quantity value - uses Decimal for precision
pub type Quantity = Decimal;

/// Timestamp in UTC
pub type Timestamp = DateTime<Utc>;

/// Symbol identifier for a tradeable instrument
pub type Symbol = String;

/// Capital in minor currency units (cents)
pub type Cents = i64;

/// Convert minor units to a major-unit decimal (`12_345` -> `123.45`)
pub fn cents_to_decimal(cents: Cents) -> Decimal {
    Decimal::new(cents, 2)
}

/// Convert a major-unit decimal to minor units, truncating fractions of a cent
pub fn decimal_to_cents(value: Decimal) -> Cents {
    use rust_decimal::prelude::ToPrimitive;
    (value * Decimal::ONE_HUNDRED).trunc().to_i64().unwrap_or(0)
}
