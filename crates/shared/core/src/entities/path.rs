use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Destination;
use crate::values::{Price, Timestamp};

/// A trade candidate: where to go and what it looked like when found
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    pub destination: Destination,
    /// Reference price of the instrument (underlying price for options)
    pub price: Price,
    /// Strike price, for option paths
    #[serde(default)]
    pub strike: Option<Price>,
    /// Expiration, for option paths
    #[serde(default)]
    pub expiration: Option<Timestamp>,
    /// Premium per unit, for option paths
    #[serde(default)]
    pub premium: Option<Price>,
}

impl Path {
    /// Create a plain path (no option metadata)
    pub fn new(destination: Destination, price: Price) -> Self {
        Self {
            destination,
            price,
            ..Default::default()
        }
    }

    /// Create an option path
    pub fn option(
        destination: Destination,
        price: Price,
        strike: Price,
        expiration: Timestamp,
        premium: Price,
    ) -> Self {
        Self {
            destination,
            price,
            strike: Some(strike),
            expiration: Some(expiration),
            premium: Some(premium),
        }
    }

    /// The zero-value path carries no destination
    pub fn is_zero(&self) -> bool {
        self.destination.is_zero()
    }

    /// Price a unit of this path costs: premium when present, otherwise the price
    pub fn unit_price(&self) -> Price {
        self.premium.unwrap_or(self.price)
    }
}

impl From<Destination> for Path {
    fn from(destination: Destination) -> Self {
        Self {
            destination,
            ..Default::default()
        }
    }
}

/// A path stamped with the time the candidate store accepted it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimestampedPath {
    pub path: Path,
    pub created_at: DateTime<Utc>,
}

impl TimestampedPath {
    pub fn new(path: Path, created_at: Timestamp) -> Self {
        Self { path, created_at }
    }

    /// Creation time in milliseconds since the epoch
    pub fn created_at_ms(&self) -> i64 {
        self.created_at.timestamp_millis()
    }
}
