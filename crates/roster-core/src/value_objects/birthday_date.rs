//! Birthday date value object
//!
//! Stored and compared as the literal `YYYY-MM-DD` string the admin typed.
//! The year is kept even though only the anniversary mode ignores it.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::DomainError;

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("static regex"));

/// A validated `YYYY-MM-DD` calendar date
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BirthdayDate(String);

impl BirthdayDate {
    /// Validate shape and calendar
    ///
    /// `2024-02-30` has the right shape but is rejected, so is `10-03-2024`.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if !DATE_SHAPE.is_match(raw) {
            return Err(DomainError::InvalidBirthdayDate(raw.to_string()));
        }
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| DomainError::InvalidBirthdayDate(raw.to_string()))?;
        Ok(Self(raw.to_string()))
    }

    /// Format a calendar day the way entries are stored
    pub fn from_naive(date: NaiveDate) -> Self {
        Self(date.format("%Y-%m-%d").to_string())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The `MM-DD` suffix
    #[inline]
    pub fn month_day(&self) -> &str {
        &self.0[5..]
    }

    /// Whether the entry fires on `day` under the given mode
    pub fn matches(&self, day: NaiveDate, mode: MatchMode) -> bool {
        match mode {
            MatchMode::Exact => self.0 == day.format("%Y-%m-%d").to_string(),
            MatchMode::Anniversary => {
                self.month_day() == format!("{:02}-{:02}", day.month(), day.day())
            }
        }
    }
}

impl fmt::Display for BirthdayDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for BirthdayDate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for BirthdayDate {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<BirthdayDate> for String {
    fn from(date: BirthdayDate) -> Self {
        date.0
    }
}

/// How stored dates are compared with "today"
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchMode {
    /// Full `YYYY-MM-DD` equality, so an entry fires on one day only
    #[default]
    Exact,
    /// Month and day only, so an entry fires every year
    Anniversary,
}

impl FromStr for MatchMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exact" => Ok(Self::Exact),
            "anniversary" => Ok(Self::Anniversary),
            other => Err(DomainError::ValidationError(format!(
                "unknown birthday match mode: {other}"
            ))),
        }
    }
}
