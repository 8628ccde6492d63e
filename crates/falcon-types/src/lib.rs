//! Validated primitive types shared across the Falcon crates.
//!
//! Each type checks its invariant once at construction, so code holding one can rely on it
//! without re-validating.

use std::fmt;
use std::str::FromStr;

/// Errors that can occur when creating validated primitive types.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TypesError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
    /// A month number outside 1..=12
    #[error("month must be between 1 and 12, got {0}")]
    MonthOutOfRange(u32),
    /// A month name that is not an English calendar month
    #[error("unknown month: '{0}'")]
    UnknownMonth(String),
    /// A year that is not a four-digit number
    #[error("year must be a four-digit number, got {0}")]
    YearOutOfRange(i64),
    /// Year text that is not a number
    #[error("invalid year: '{0}'")]
    InvalidYear(String),
}

/// A string type that guarantees non-empty content.
///
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// # Errors
    ///
    /// Returns `TypesError::Empty` if the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TypesError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TypesError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for NonEmptyText {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month, 1 (January) through 12 (December).
///
/// Serialises as its number. Parses from either the number or the English month name
/// (case-insensitive).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(u8);

impl Month {
    pub const JANUARY: Month = Month(1);
    pub const DECEMBER: Month = Month(12);

    /// All twelve months, January first.
    pub const ALL: [Month; 12] = [
        Month(1),
        Month(2),
        Month(3),
        Month(4),
        Month(5),
        Month(6),
        Month(7),
        Month(8),
        Month(9),
        Month(10),
        Month(11),
        Month(12),
    ];

    /// Creates a month from its 1-based number.
    ///
    /// # Errors
    ///
    /// Returns `TypesError::MonthOutOfRange` if `number` is not in 1..=12.
    pub fn new(number: u32) -> Result<Self, TypesError> {
        match number {
            1..=12 => Ok(Self(number as u8)),
            _ => Err(TypesError::MonthOutOfRange(number)),
        }
    }

    /// Creates a month from its English name, ignoring case and surrounding whitespace.
    pub fn from_name(name: &str) -> Result<Self, TypesError> {
        let wanted = name.trim();
        MONTH_NAMES
            .iter()
            .position(|m| m.eq_ignore_ascii_case(wanted))
            .map(|i| Self(i as u8 + 1))
            .ok_or_else(|| TypesError::UnknownMonth(name.to_owned()))
    }

    /// The 1-based month number.
    pub fn number(self) -> u32 {
        u32::from(self.0)
    }

    /// The 0-based position of this month within a year.
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    pub fn name(self) -> &'static str {
        MONTH_NAMES[self.index()]
    }

    pub fn all() -> impl Iterator<Item = Month> {
        Self::ALL.into_iter()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for Month {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<u32>() {
            Ok(n) => Self::new(n),
            Err(_) => Self::from_name(s),
        }
    }
}

impl serde::Serialize for Month {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Month {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let n = u32::deserialize(deserializer)?;
        Month::new(n).map_err(serde::de::Error::custom)
    }
}

/// A four-digit calendar year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Year(u16);

impl Year {
    pub const MIN: Year = Year(1000);
    pub const MAX: Year = Year(9999);

    /// # Errors
    ///
    /// Returns `TypesError::YearOutOfRange` unless `year` is in 1000..=9999.
    pub fn new(year: i64) -> Result<Self, TypesError> {
        match year {
            1000..=9999 => Ok(Self(year as u16)),
            _ => Err(TypesError::YearOutOfRange(year)),
        }
    }

    pub fn value(self) -> i32 {
        i32::from(self.0)
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for Year {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = s
            .trim()
            .parse::<i64>()
            .map_err(|_| TypesError::InvalidYear(s.to_owned()))?;
        Self::new(parsed)
    }
}

impl serde::Serialize for Year {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u16(self.0)
    }
}

impl<'de> serde::Deserialize<'de> for Year {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let n = i64::deserialize(deserializer)?;
        Year::new(n).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty_text_trims_input() {
        let text = NonEmptyText::new("  CDC/NHSN ").unwrap();
        assert_eq!(text.as_str(), "CDC/NHSN");
    }

    #[test]
    fn test_non_empty_text_rejects_whitespace() {
        assert_eq!(NonEmptyText::new("   "), Err(TypesError::Empty));
    }

    #[test]
    fn test_month_rejects_out_of_range() {
        assert_eq!(Month::new(0), Err(TypesError::MonthOutOfRange(0)));
        assert_eq!(Month::new(13), Err(TypesError::MonthOutOfRange(13)));
    }

    #[test]
    fn test_month_names_and_index() {
        let march = Month::new(3).unwrap();
        assert_eq!(march.name(), "March");
        assert_eq!(march.index(), 2);
        assert_eq!(Month::DECEMBER.name(), "December");
    }

    #[test]
    fn test_month_parses_number_or_name() {
        assert_eq!("7".parse::<Month>().unwrap().number(), 7);
        assert_eq!("july".parse::<Month>().unwrap().number(), 7);
        assert_eq!(" September ".parse::<Month>().unwrap().number(), 9);
        assert!(matches!(
            "Smarch".parse::<Month>(),
            Err(TypesError::UnknownMonth(_))
        ));
    }

    #[test]
    fn test_month_all_yields_twelve_in_order() {
        let names: Vec<&str> = Month::all().map(Month::name).collect();
        assert_eq!(names.len(), 12);
        assert_eq!(names[0], "January");
        assert_eq!(names[11], "December");
    }

    #[test]
    fn test_month_serialises_as_number() {
        let json = serde_json::to_string(&Month::new(4).unwrap()).unwrap();
        assert_eq!(json, "4");
        assert!(serde_json::from_str::<Month>("13").is_err());
    }

    #[test]
    fn test_display_honours_width_and_alignment() {
        let month = Month::new(5).unwrap();
        let year = Year::new(2024).unwrap();
        let text = NonEmptyText::new("CDC").unwrap();

        assert_eq!(format!("[{:<9}]", month), "[May      ]");
        assert_eq!(format!("[{:>6}]", year), "[  2024]");
        assert_eq!(format!("[{:^7}]", text), "[  CDC  ]");
        assert_eq!(format!("{} {}", month, year), "May 2024");
    }

    #[test]
    fn test_year_requires_four_digits() {
        assert_eq!(Year::new(2024).unwrap().value(), 2024);
        assert_eq!(Year::new(999), Err(TypesError::YearOutOfRange(999)));
        assert!("20x4".parse::<Year>().is_err());
    }
}
