//! Round and ledger types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Round identifier
///
/// Issue numbers are 17+ digit integers, past the 53-bit range a float can
/// hold exactly, so they are kept as `u64` end to end. The API sends them as
/// strings; integers are accepted too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "String")]
pub struct Period(u64);

impl Period {
    /// Wrap a raw period value
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw value
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The period that follows this one
    pub fn next(self) -> Result<Period, LedgerError> {
        self.0
            .checked_add(1)
            .map(Period)
            .ok_or(LedgerError::PeriodOverflow(self))
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Period {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<u64>().map(Period)
    }
}

impl From<Period> for String {
    fn from(period: Period) -> Self {
        period.to_string()
    }
}

/// String-or-integer JSON field
#[derive(Deserialize)]
#[serde(untagged)]
enum NumericField {
    Int(u64),
    Text(String),
}

impl<'de> Deserialize<'de> for Period {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match NumericField::deserialize(deserializer)? {
            NumericField::Int(v) => Ok(Period(v)),
            NumericField::Text(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}

/// A round outcome digit (0-9)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(into = "u8")]
pub struct Digit(u8);

impl Digit {
    /// Lowest BIG digit
    pub const BIG_THRESHOLD: u8 = 5;

    /// Create a digit, rejecting anything outside 0-9
    pub fn new(value: u8) -> Option<Self> {
        (value <= 9).then_some(Self(value))
    }

    pub const fn value(self) -> u8 {
        self.0
    }
}

impl From<Digit> for u8 {
    fn from(digit: Digit) -> Self {
        digit.0
    }
}

impl fmt::Display for Digit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<'de> Deserialize<'de> for Digit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = match NumericField::deserialize(deserializer)? {
            NumericField::Int(v) => v,
            NumericField::Text(s) => s.trim().parse().map_err(serde::de::Error::custom)?,
        };
        u8::try_from(raw)
            .ok()
            .and_then(Digit::new)
            .ok_or_else(|| serde::de::Error::custom(format!("outcome digit out of range: {raw}")))
    }
}

/// Predicted or actual direction of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Outcome digit 5-9
    Big,
    /// Outcome digit 0-4
    Small,
}

impl Direction {
    /// Direction of an outcome digit
    pub fn of(digit: Digit) -> Self {
        if digit.value() >= Digit::BIG_THRESHOLD {
            Direction::Big
        } else {
            Direction::Small
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Direction::Big => "BIG",
            Direction::Small => "SMALL",
        };
        f.pad(label)
    }
}

/// Grading lifecycle of a round's prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GradingStatus {
    /// Waiting for the round to close
    Pending,
    /// Prediction matched the outcome
    Win,
    /// Prediction missed the outcome
    Loss,
    /// The source moved past this round without ever reporting it
    Expired,
}

impl GradingStatus {
    pub fn is_pending(self) -> bool {
        self == GradingStatus::Pending
    }
}

impl fmt::Display for GradingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            GradingStatus::Pending => "Pending",
            GradingStatus::Win => "WIN",
            GradingStatus::Loss => "LOSS",
            GradingStatus::Expired => "Expired",
        };
        f.write_str(label)
    }
}

/// One predicted round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Round {
    /// Round identifier
    pub period: Period,
    /// Direction predicted before the round closed
    pub predicted: Direction,
    /// Actual outcome, known once graded
    pub outcome: Option<Digit>,
    /// Grading status
    pub status: GradingStatus,
    /// When the prediction was made
    pub predicted_at: DateTime<Utc>,
    /// When the round was graded or expired
    pub graded_at: Option<DateTime<Utc>>,
}

impl Round {
    /// Create a new pending round
    pub fn pending(period: Period, predicted: Direction, predicted_at: DateTime<Utc>) -> Self {
        Self {
            period,
            predicted,
            outcome: None,
            status: GradingStatus::Pending,
            predicted_at,
            graded_at: None,
        }
    }

    /// Grade against the actual outcome. Only a pending round can be graded.
    pub fn grade(&mut self, outcome: Digit, at: DateTime<Utc>) -> Result<GradingStatus, LedgerError> {
        if !self.status.is_pending() {
            return Err(LedgerError::AlreadyGraded(self.period, self.status));
        }

        self.status = if Direction::of(outcome) == self.predicted {
            GradingStatus::Win
        } else {
            GradingStatus::Loss
        };
        self.outcome = Some(outcome);
        self.graded_at = Some(at);
        Ok(self.status)
    }

    /// Mark an unmatched pending round as expired
    pub fn expire(&mut self, at: DateTime<Utc>) -> Result<(), LedgerError> {
        if !self.status.is_pending() {
            return Err(LedgerError::AlreadyGraded(self.period, self.status));
        }
        self.status = GradingStatus::Expired;
        self.graded_at = Some(at);
        Ok(())
    }

    /// Actual direction, when the outcome is known
    pub fn actual(&self) -> Option<Direction> {
        self.outcome.map(Direction::of)
    }
}

/// Ledger invariant violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// A round with this period is already in the ledger
    #[error("Duplicate period: {0}")]
    DuplicatePeriod(Period),
    /// The round has already left the pending state
    #[error("Round {0} already graded: {1}")]
    AlreadyGraded(Period, GradingStatus),
    /// Period arithmetic overflowed
    #[error("Period overflow after {0}")]
    PeriodOverflow(Period),
}
