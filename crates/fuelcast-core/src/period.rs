//! Forecast periods and the calendar arithmetic formulas need.
//!
//! A period is a year with an optional month; no month means an annual
//! value that applies to every month of that year unless a more specific
//! entry exists. Persistence rows carry periods as `YYYY` or `YYYYMM`
//! strings, parsed and formatted here.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A (year, optional month) key. `month == None` is an annual period.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Period {
    pub year: i32,
    pub month: Option<u8>,
}

/// Errors from parsing a `YYYY` / `YYYYMM` period string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodParseError {
    #[error("period string must be 4 (YYYY) or 6 (YYYYMM) digits, got {0:?}")]
    InvalidLength(String),
    #[error("period string contains non-digit characters: {0:?}")]
    NotNumeric(String),
    #[error("month {0} is outside 1-12")]
    MonthOutOfRange(u8),
}

impl Period {
    /// An annual period covering all twelve months of `year`.
    pub fn annual(year: i32) -> Self {
        Self { year, month: None }
    }

    /// A single calendar month.
    pub fn month(year: i32, month: u8) -> Self {
        Self {
            year,
            month: Some(month),
        }
    }

    pub fn is_annual(&self) -> bool {
        self.month.is_none()
    }

    /// Parse a `YYYY` or `YYYYMM` persistence string. Months outside 1-12
    /// are rejected here even though the in-memory store is permissive.
    pub fn parse(s: &str) -> Result<Self, PeriodParseError> {
        if s.len() != 4 && s.len() != 6 {
            return Err(PeriodParseError::InvalidLength(s.to_string()));
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PeriodParseError::NotNumeric(s.to_string()));
        }
        let year: i32 = s[..4]
            .parse()
            .map_err(|_| PeriodParseError::NotNumeric(s.to_string()))?;
        if s.len() == 4 {
            return Ok(Self::annual(year));
        }
        let month: u8 = s[4..]
            .parse()
            .map_err(|_| PeriodParseError::NotNumeric(s.to_string()))?;
        if !(1..=12).contains(&month) {
            return Err(PeriodParseError::MonthOutOfRange(month));
        }
        Ok(Self::month(year, month))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.month {
            Some(m) => write!(f, "{:04}{:02}", self.year, m),
            None => write!(f, "{:04}", self.year),
        }
    }
}

impl std::str::FromStr for Period {
    type Err = PeriodParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// ---------------------------------------------------------------------------
// Calendar helpers
// ---------------------------------------------------------------------------

/// Gregorian leap-year rule.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days in a calendar month. Callers pass months 1-12; any other value
/// falls back to 30 days (the store never range-checks months).
pub fn days_in_month(year: i32, month: u8) -> u8 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
        _ => 30,
    }
}

/// Hours in a calendar month, for capacity-to-energy conversions.
pub fn hours_in_month(year: i32, month: u8) -> u32 {
    days_in_month(year, month) as u32 * 24
}
