//! Type-safe price representation using decimal arithmetic.

use core::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is empty after trimming.
    #[error("price cannot be empty")]
    Empty,
    /// The input is not a decimal number.
    #[error("price must be a decimal number")]
    NotANumber,
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// More fractional digits than cents allow.
    #[error("price can have at most {max} decimal places")]
    TooPrecise {
        /// Maximum fractional digits.
        max: u32,
    },
}

/// A non-negative amount in Brazilian reais, kept at cent precision.
///
/// Stored in the database as its canonical text form (`"19.90"`), since
/// `SQLite` has no exact decimal column type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Fractional digits kept for every price.
    pub const SCALE: u32 = 2;

    /// Create a price from an amount.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount` is negative or has more than two
    /// fractional digits.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        if amount.normalize().scale() > Self::SCALE {
            return Err(PriceError::TooPrecise { max: Self::SCALE });
        }
        let mut amount = amount;
        amount.set_sign_positive(true);
        amount.rescale(Self::SCALE);
        Ok(Self(amount))
    }

    /// Parse user input, accepting either `,` or `.` as the decimal separator.
    ///
    /// ```
    /// use loja_core::Price;
    ///
    /// assert_eq!(Price::parse("19,9").unwrap().to_string(), "19.90");
    /// assert_eq!(Price::parse(" 7.25 ").unwrap().to_string(), "7.25");
    /// assert!(Price::parse("-1").is_err());
    /// ```
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not a number, negative, or has
    /// more than two fractional digits.
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(PriceError::Empty);
        }
        let amount = Decimal::from_str(&s.replace(',', ".")).map_err(|_| PriceError::NotANumber)?;
        Self::new(amount)
    }

    /// Returns the amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Format for display, e.g. `R$ 19,90`.
    #[must_use]
    pub fn display(&self) -> String {
        format!("R$ {}", self.0.to_string().replace('.', ","))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Price {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Price {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode(self.0.to_string(), buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rescales_to_cents() {
        assert_eq!(Price::parse("10").unwrap().to_string(), "10.00");
        assert_eq!(Price::parse("10.5").unwrap().to_string(), "10.50");
    }

    #[test]
    fn test_parse_accepts_comma_separator() {
        assert_eq!(Price::parse("1234,56").unwrap(), Price::parse("1234.56").unwrap());
    }

    #[test]
    fn test_parse_zero_is_allowed() {
        assert_eq!(Price::parse("0").unwrap().amount(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Price::parse(""), Err(PriceError::Empty));
        assert_eq!(Price::parse("abc"), Err(PriceError::NotANumber));
        assert_eq!(Price::parse("-0.01"), Err(PriceError::Negative));
        assert_eq!(
            Price::parse("1.999"),
            Err(PriceError::TooPrecise { max: 2 })
        );
    }

    #[test]
    fn test_trailing_zeros_are_not_extra_precision() {
        assert!(Price::parse("2.5000").is_ok());
    }

    #[test]
    fn test_display_in_reais() {
        assert_eq!(Price::parse("49.9").unwrap().display(), "R$ 49,90");
    }
}
