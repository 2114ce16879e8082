//! # HRMS Types
//!
//! Validated primitive types shared by the record store and the interface.
//!
//! Values of these types are checked once at construction, so code further in
//! never needs to re-validate a patient name or an age.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TextError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for NonEmptyText {
    type Err = TextError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for NonEmptyText {
    type Error = TextError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NonEmptyText> for String {
    fn from(value: NonEmptyText) -> Self {
        value.0
    }
}

/// Errors returned when parsing or constructing an [`Age`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AgeError {
    #[error("age must be between 0 and {max}, got {0}", max = Age::MAX)]
    OutOfRange(i64),
    #[error("age must be a whole number, got {0:?}")]
    NotANumber(String),
}

/// Patient age in whole years, bounded to `0..=120`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct Age(u8);

impl Age {
    /// Largest accepted age.
    pub const MAX: u8 = 120;

    /// # Errors
    ///
    /// Returns `AgeError::OutOfRange` for negative values or values above [`Age::MAX`].
    pub fn new(years: i64) -> Result<Self, AgeError> {
        match u8::try_from(years) {
            Ok(y) if y <= Self::MAX => Ok(Self(y)),
            _ => Err(AgeError::OutOfRange(years)),
        }
    }

    pub fn years(self) -> u8 {
        self.0
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Age {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Age {
    type Err = AgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let years = trimmed
            .parse::<i64>()
            .map_err(|_| AgeError::NotANumber(trimmed.to_owned()))?;
        Self::new(years)
    }
}

impl TryFrom<i64> for Age {
    type Error = AgeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Age> for u8 {
    fn from(value: Age) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_text_trims_input() {
        let text = NonEmptyText::new("  Alice Smith \n").expect("should accept padded text");
        assert_eq!(text.as_str(), "Alice Smith");
    }

    #[test]
    fn test_non_empty_text_rejects_whitespace() {
        assert_eq!(NonEmptyText::new("   "), Err(TextError::Empty));
        assert_eq!("".parse::<NonEmptyText>(), Err(TextError::Empty));
    }

    #[test]
    fn test_non_empty_text_deserialize_validates() {
        let err = serde_json::from_str::<NonEmptyText>("\"  \"");
        assert!(err.is_err(), "blank text should not deserialize");

        let ok: NonEmptyText = serde_json::from_str("\"Bob\"").expect("should deserialize");
        assert_eq!(ok.as_str(), "Bob");
    }

    #[test]
    fn test_age_bounds() {
        assert_eq!(Age::new(0).map(Age::years), Ok(0));
        assert_eq!(Age::new(120).map(Age::years), Ok(120));
        assert_eq!(Age::new(121), Err(AgeError::OutOfRange(121)));
        assert_eq!(Age::new(-1), Err(AgeError::OutOfRange(-1)));
        assert_eq!(Age::new(255), Err(AgeError::OutOfRange(255)));
        assert_eq!(Age::new(256), Err(AgeError::OutOfRange(256)));
    }

    #[test]
    fn test_age_from_str() {
        assert_eq!(" 42 ".parse::<Age>().map(Age::years), Ok(42));
        assert_eq!(
            "forty".parse::<Age>(),
            Err(AgeError::NotANumber("forty".into()))
        );
    }

    #[test]
    fn test_age_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Age>("130").is_err());
        let age: Age = serde_json::from_str("30").expect("should deserialize");
        assert_eq!(age.years(), 30);
        assert!(!age.is_zero());
    }
}
