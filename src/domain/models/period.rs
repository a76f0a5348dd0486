use std::fmt;
use std::str::FromStr;

use chrono::{Days, NaiveDate};
use serde::{Serialize, Serializer};

use crate::domain::errors::DomainError;

/// Position of a dunning message relative to the invoice due date.
///
/// Textual form is `D-N` (N days before due), `D+0` (due today) or `D+N`
/// (N days overdue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodCode {
    BeforeDue(u32),
    DueToday,
    Overdue(u32),
}

impl PeriodCode {
    /// Due date of the invoices this period targets when run on `today`.
    pub fn target_date(&self, today: NaiveDate) -> Result<NaiveDate, DomainError> {
        let shifted = match *self {
            PeriodCode::BeforeDue(days) => today.checked_add_days(Days::new(days.into())),
            PeriodCode::DueToday => Some(today),
            PeriodCode::Overdue(days) => today.checked_sub_days(Days::new(days.into())),
        };
        shifted.ok_or_else(|| {
            DomainError::Validation(format!("target date for {self} out of range from {today}"))
        })
    }

    pub fn date_rule(&self) -> String {
        match *self {
            PeriodCode::BeforeDue(days) => format!("due in {days} day(s)"),
            PeriodCode::DueToday => "due today".to_string(),
            PeriodCode::Overdue(days) => format!("{days} day(s) overdue"),
        }
    }
}

impl fmt::Display for PeriodCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodCode::BeforeDue(days) => write!(f, "D-{days}"),
            PeriodCode::DueToday => f.write_str("D+0"),
            PeriodCode::Overdue(days) => write!(f, "D+{days}"),
        }
    }
}

impl FromStr for PeriodCode {
    type Err = DomainError;

    /// Accepts only the canonical spelling: no padding, no leading zeros and
    /// `D+0` for the due date.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let invalid = || DomainError::NotFound(value.to_string());
        let rest = value.strip_prefix('D').ok_or_else(invalid)?;
        let (sign, digits) = rest.split_at_checked(1).ok_or_else(invalid)?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let days: u32 = digits.parse().map_err(|_| invalid())?;
        let parsed = match (sign, days) {
            ("+", 0) => PeriodCode::DueToday,
            ("-", 0) => return Err(invalid()),
            ("-", n) => PeriodCode::BeforeDue(n),
            ("+", n) => PeriodCode::Overdue(n),
            _ => return Err(invalid()),
        };
        if parsed.to_string() != value {
            return Err(invalid());
        }
        Ok(parsed)
    }
}

impl Serialize for PeriodCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
