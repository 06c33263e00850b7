//! National identification number (Brazilian CPF).
//!
//! Only the structure is checked: eleven digits once the usual `.`/`-`
//! punctuation is removed, and not a single repeated digit. Check digits are
//! not verified.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`NationalId`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum NationalIdError {
    /// The input is empty after trimming.
    #[error("national id cannot be empty")]
    Empty,
    /// A character other than a digit or accepted punctuation was found.
    #[error("national id may only contain digits, '.' and '-'")]
    InvalidCharacter,
    /// Wrong number of digits.
    #[error("national id must have {expected} digits (got {actual})")]
    WrongLength {
        /// Required digit count.
        expected: usize,
        /// Digits found in the input.
        actual: usize,
    },
    /// Every digit is the same (e.g. `111.111.111-11`).
    #[error("national id cannot repeat a single digit")]
    RepeatedDigits,
}

/// A national id stored as its bare digits.
///
/// ```
/// use loja_core::NationalId;
///
/// let id = NationalId::parse("529.982.247-25").unwrap();
/// assert_eq!(id.as_str(), "52998224725");
/// assert_eq!(id.formatted(), "529.982.247-25");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct NationalId(String);

impl NationalId {
    /// Number of digits in a national id.
    pub const DIGITS: usize = 11;

    /// Parse a national id, accepting the punctuated or bare form.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, contains characters other than
    /// digits, `.`, `-` or spaces, does not have exactly 11 digits, or
    /// repeats a single digit.
    pub fn parse(s: &str) -> Result<Self, NationalIdError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(NationalIdError::Empty);
        }

        let mut digits = String::with_capacity(Self::DIGITS);
        for c in s.chars() {
            match c {
                '0'..='9' => digits.push(c),
                '.' | '-' | ' ' => {}
                _ => return Err(NationalIdError::InvalidCharacter),
            }
        }

        if digits.len() != Self::DIGITS {
            return Err(NationalIdError::WrongLength {
                expected: Self::DIGITS,
                actual: digits.len(),
            });
        }

        let mut chars = digits.chars();
        if let Some(first) = chars.next()
            && chars.all(|c| c == first)
        {
            return Err(NationalIdError::RepeatedDigits);
        }

        Ok(Self(digits))
    }

    /// Returns the bare digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the id in the `000.000.000-00` display form.
    #[must_use]
    pub fn formatted(&self) -> String {
        let d = &self.0;
        match (d.get(0..3), d.get(3..6), d.get(6..9), d.get(9..11)) {
            (Some(a), Some(b), Some(c), Some(check)) => format!("{a}.{b}.{c}-{check}"),
            _ => d.clone(),
        }
    }
}

impl fmt::Display for NationalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl std::str::FromStr for NationalId {
    type Err = NationalIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for NationalId {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for NationalId {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(Self::parse(&s)?)
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for NationalId {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&self.0, buf)
    }
}
