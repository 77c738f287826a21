//! Shared wire types.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer, Visitor};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// A decimal monetary amount, kept as its exact wire text.
///
/// The server emits amounts inconsistently as JSON numbers or strings;
/// both deserialize. Serialization always emits a string, which is what
/// the server expects on writes, and the stored text is never reformatted
/// so no precision is lost passing values through.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(String);

impl Money {
    /// Wrap an already-formatted decimal amount.
    pub fn new(amount: impl Into<String>) -> Self {
        Money(amount.into())
    }

    /// The amount as its decimal text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse into an `f64` for arithmetic. Lossy for amounts beyond
    /// 53-bit precision; display and round-tripping should use the
    /// stored text instead.
    pub fn to_f64(&self) -> Option<f64> {
        f64::from_str(&self.0).ok()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Money {
    fn from(amount: &str) -> Self {
        Money(amount.to_string())
    }
}

impl From<String> for Money {
    fn from(amount: String) -> Self {
        Money(amount)
    }
}

impl From<f64> for Money {
    fn from(amount: f64) -> Self {
        Money(format!("{amount:.2}"))
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MoneyVisitor;

        impl<'de> Visitor<'de> for MoneyVisitor {
            type Value = Money;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal amount as a string or number")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
                Ok(Money(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
                Ok(Money(format!("{v}")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
                Ok(Money(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
                Ok(Money(v.to_string()))
            }
        }

        deserializer.deserialize_any(MoneyVisitor)
    }
}
