use std::{
    fmt,
    ops::Sub,
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Signed money amount represented as **integer cents**.
///
/// Every figure the engine handles (transaction amounts, planned and
/// realized totals, carried-over balances) uses this type, so monthly sums and
/// the carry-over chain are exact.
///
/// # Examples
///
/// ```rust
/// use engine::MoneyCents;
///
/// let amount = MoneyCents::new(12_34);
/// assert_eq!(amount.cents(), 1234);
/// assert_eq!(amount.to_string(), "12.34");
/// ```
///
/// Parsing accepts `.` or `,` as decimal separator and tolerates thousands
/// grouping. A separator that appears once is always the decimal separator,
/// so a lone group such as `1.500` reads as three decimals and is rejected;
/// write `1500`, `1.500,00` or `1,500.00` instead:
///
/// ```rust
/// use engine::MoneyCents;
///
/// assert_eq!("10,5".parse::<MoneyCents>().unwrap().cents(), 1050);
/// assert_eq!("1.500,00".parse::<MoneyCents>().unwrap().cents(), 150_000);
/// assert_eq!("1,500.00".parse::<MoneyCents>().unwrap().cents(), 150_000);
/// assert_eq!("1.500.000".parse::<MoneyCents>().unwrap().cents(), 150_000_000);
/// assert!("1.500".parse::<MoneyCents>().is_err());
/// assert!("12.345".parse::<MoneyCents>().is_err());
/// ```
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct MoneyCents(i64);

impl MoneyCents {
    pub const ZERO: MoneyCents = MoneyCents(0);

    /// Creates a new amount from integer cents.
    #[must_use]
    pub const fn new(cents: i64) -> Self {
        Self(cents)
    }

    /// Returns the raw value in cents.
    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Checked addition (returns `None` on overflow).
    #[must_use]
    pub fn checked_add(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_add(rhs.0).map(MoneyCents)
    }

    /// Checked subtraction (returns `None` on overflow).
    #[must_use]
    pub fn checked_sub(self, rhs: MoneyCents) -> Option<MoneyCents> {
        self.0.checked_sub(rhs.0).map(MoneyCents)
    }
}

impl fmt::Display for MoneyCents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}

impl Sub for MoneyCents {
    type Output = MoneyCents;

    fn sub(self, rhs: MoneyCents) -> Self::Output {
        MoneyCents(self.0 - rhs.0)
    }
}


/// Splits `digits` into integer and fractional parts, removing grouping.
///
/// With both separators present the rightmost one is the decimal separator.
/// A separator repeated more than once is grouping. A single separator is a
/// decimal separator.
fn split_decimal(digits: &str) -> Option<(String, Option<String>)> {
    let last_dot = digits.rfind('.');
    let last_comma = digits.rfind(',');

    let decimal = match (last_dot, last_comma) {
        (Some(dot), Some(comma)) => Some(dot.max(comma)),
        (Some(idx), None) | (None, Some(idx)) => {
            let sep = digits[idx..].chars().next()?;
            if digits.matches(sep).count() == 1 {
                Some(idx)
            } else {
                None
            }
        }
        (None, None) => None,
    };

    let (int_part, frac_part) = match decimal {
        Some(idx) => (&digits[..idx], Some(digits[idx + 1..].to_string())),
        None => (digits, None),
    };

    let mut groups = int_part.split(['.', ',']);
    let head = groups.next()?;
    let mut int_digits = head.to_string();
    for group in groups {
        if group.len() != 3 || head.is_empty() || head.len() > 3 {
            return None;
        }
        int_digits.push_str(group);
    }

    Some((int_digits, frac_part))
}

impl FromStr for MoneyCents {
    type Err = EngineError;

    /// Parses a decimal string into cents.
    ///
    /// Validation rules:
    /// - max 2 fractional digits (rejects `12.345`)
    /// - thousands groups must have 3 digits (`1.500.000`)
    /// - rejects empty/invalid strings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let empty = || EngineError::InvalidAmount("empty amount".to_string());
        let invalid = || EngineError::InvalidAmount(format!("invalid amount: {s}"));
        let overflow = || EngineError::InvalidAmount("amount too large".to_string());

        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(empty());
        }

        let (negative, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
            (true, stripped.trim_start())
        } else if let Some(stripped) = trimmed.strip_prefix('+') {
            (false, stripped.trim_start())
        } else {
            (false, trimmed)
        };
        if rest.is_empty() {
            return Err(empty());
        }

        let (units_str, frac) = split_decimal(rest).ok_or_else(invalid)?;
        if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
            return Err(invalid());
        }
        let units: i64 = units_str.parse().map_err(|_| overflow())?;

        let cents: i64 = match frac.as_deref() {
            None | Some("") => 0,
            Some(frac) => {
                if !frac.chars().all(|c| c.is_ascii_digit()) {
                    return Err(invalid());
                }
                match frac.len() {
                    1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                    2 => frac.parse::<i64>().map_err(|_| invalid())?,
                    _ => return Err(EngineError::InvalidAmount("too many decimals".to_string())),
                }
            }
        };

        let total = units
            .checked_mul(100)
            .and_then(|v| v.checked_add(cents))
            .ok_or_else(overflow)?;

        Ok(MoneyCents(if negative { -total } else { total }))
    }
}
