use chrono::{Datelike, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use thiserror::Error;

static COMPETENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{2})/(\d{4})").expect("competence regex is valid"));

/// Monetary amount in centavos.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("empty value")]
    Empty,
    #[error("invalid value {0:?}")]
    Invalid(String),
    #[error("value {0:?} is out of range")]
    Overflow(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompetenceError {
    #[error("no MM/YYYY competence in {0:?}")]
    NotFound(String),
    #[error("invalid competence month in {0:?}")]
    InvalidMonth(String),
}

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn from_centavos(centavos: i64) -> Self {
        Money(centavos)
    }

    /// `None` when the sum does not fit.
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }

    /// Brazilian notation without the currency symbol, e.g. `4.333,97`.
    pub fn to_brl_string(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let reais = (abs / 100).to_string();
        let centavos = abs % 100;

        let mut grouped = String::with_capacity(reais.len() + reais.len() / 3);
        for (i, c) in reais.chars().enumerate() {
            if i > 0 && (reais.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(c);
        }

        format!("{}{},{:02}", sign, grouped, centavos)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R$ {}", self.to_brl_string())
    }
}

/// Parses an amount written with `.` as thousands separator and `,` as the
/// decimal separator. A leading `R$` is tolerated.
pub fn parse_brl(text: &str) -> Result<Money, ValueError> {
    let trimmed = text.trim();
    let trimmed = trimmed.strip_prefix("R$").unwrap_or(trimmed).trim();
    if trimmed.is_empty() {
        return Err(ValueError::Empty);
    }

    let invalid = || ValueError::Invalid(text.trim().to_string());

    let (integer, fraction) = match trimmed.split_once(',') {
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };
    if fraction.contains(',') {
        return Err(invalid());
    }

    let integer: String = integer.chars().filter(|c| *c != '.').collect();
    if integer.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if !integer.chars().all(|c| c.is_ascii_digit()) || !fraction.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }

    let overflow = || ValueError::Overflow(text.trim().to_string());

    let reais: i64 = if integer.is_empty() {
        0
    } else {
        integer.parse().map_err(|_| overflow())?
    };

    let digits: Vec<i64> = fraction
        .bytes()
        .map(|b| i64::from(b - b'0'))
        .collect();
    let mut centavos = digits.first().copied().unwrap_or(0) * 10 + digits.get(1).copied().unwrap_or(0);
    if digits.get(2).copied().unwrap_or(0) >= 5 {
        centavos += 1;
    }

    reais
        .checked_mul(100)
        .and_then(|v| v.checked_add(centavos))
        .map(Money)
        .ok_or_else(overflow)
}

/// Month/year a fiscal document is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Competence(NaiveDate);

impl Competence {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(Competence)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }
}

impl fmt::Display for Competence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month(), self.year())
    }
}

/// Finds the first `MM/YYYY` occurrence in `text`.
///
/// The month must be a real calendar month: `13/2024` is an error here, not
/// an earlier-year competence, so a row carrying it is skipped instead of
/// stopping the scan or being counted.
pub fn parse_competence(text: &str) -> Result<Competence, CompetenceError> {
    let caps = COMPETENCE_RE
        .captures(text)
        .ok_or_else(|| CompetenceError::NotFound(text.to_string()))?;

    // Both groups are fixed-width digit runs, so these parses cannot fail.
    let month: u32 = caps[1].parse().unwrap_or(0);
    let year: i32 = caps[2].parse().unwrap_or(0);

    Competence::new(year, month).ok_or_else(|| CompetenceError::InvalidMonth(text.to_string()))
}
