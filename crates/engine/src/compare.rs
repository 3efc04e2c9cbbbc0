//! Realized versus planned comparison for dashboards.
//!
//! Nothing here is persisted: comparisons are derived from the current
//! budget rows on every read.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};

use crate::{BudgetMonth, BudgetStatus, EngineError, MoneyCents, reallocate::is_future_month};

/// Which realized figure a month is compared with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonMode {
    /// Cumulative position: the month's carried-over balance.
    #[default]
    WithCarryOver,
    /// The month's own net, ignoring earlier months.
    WithoutCarryOver,
}

impl FromStr for ComparisonMode {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "with" | "with_carry_over" | "carry_over" => Ok(Self::WithCarryOver),
            "without" | "without_carry_over" | "monthly" => Ok(Self::WithoutCarryOver),
            _ => Err(EngineError::InvalidMode(s.trim().to_string())),
        }
    }
}

/// Gap relative to the planned amount, in hundredths of a percent.
///
/// `None` means the plan was zero, rendered as `0%`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GapPercentage(Option<i64>);

impl GapPercentage {
    /// `gap / planned * 100`, rounded half away from zero to two decimals.
    /// A negative plan flips the sign of the result.
    pub fn new(gap: MoneyCents, planned: MoneyCents) -> Self {
        if planned.is_zero() {
            return Self(None);
        }
        let num = i128::from(gap.cents()) * 10_000;
        let den = i128::from(planned.cents());
        let mut hundredths = num / den;
        if (num % den).abs() * 2 >= den.abs() {
            hundredths += num.signum() * den.signum();
        }
        let clamped = hundredths.clamp(i128::from(i64::MIN), i128::from(i64::MAX));
        Self(Some(clamped as i64))
    }
}

impl fmt::Display for GapPercentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(value) = self.0 else {
            return f.write_str("0%");
        };
        let sign = match value.signum() {
            1 => "+",
            -1 => "-",
            _ => "",
        };
        let abs = value.unsigned_abs();
        write!(f, "{sign}{}.{:02}%", abs / 100, abs % 100)
    }
}

impl Serialize for GapPercentage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthlyComparison {
    pub month: u32,
    pub planned_amount: MoneyCents,
    pub realized_amount: MoneyCents,
    pub gap_money: MoneyCents,
    pub gap_percentage: GapPercentage,
    pub status: BudgetStatus,
}

/// Compare one month. Plans are never cumulative, so carry-over mode still
/// measures against the month's own planned amount.
pub fn compare_month(
    row: &BudgetMonth,
    mode: ComparisonMode,
    today: NaiveDate,
) -> MonthlyComparison {
    let planned_amount = row.planned_amount();
    let realized_amount = match mode {
        ComparisonMode::WithCarryOver => row.carried_over_balance,
        ComparisonMode::WithoutCarryOver => row.net(),
    };
    let gap_money = realized_amount
        .checked_sub(planned_amount)
        .unwrap_or(if planned_amount.is_negative() {
            MoneyCents::new(i64::MAX)
        } else {
            MoneyCents::new(i64::MIN)
        });

    let status = if is_future_month(row.year, row.month, today) {
        BudgetStatus::Future
    } else if !row.has_transactions() {
        BudgetStatus::NoData
    } else {
        BudgetStatus::from_sign(gap_money)
    };

    MonthlyComparison {
        month: row.month,
        planned_amount,
        realized_amount,
        gap_money,
        gap_percentage: GapPercentage::new(gap_money, planned_amount),
        status,
    }
}

/// Compare every month of `rows` in month order.
pub fn compare(
    rows: &[BudgetMonth],
    mode: ComparisonMode,
    today: NaiveDate,
) -> Vec<MonthlyComparison> {
    let mut comparisons: Vec<MonthlyComparison> = rows
        .iter()
        .map(|row| compare_month(row, mode, today))
        .collect();
    comparisons.sort_by_key(|c| c.month);
    comparisons
}

/// Year totals for dashboard headers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct YearSummary {
    pub total_income: MoneyCents,
    pub total_expense: MoneyCents,
    /// Carried-over balance of the last configured month.
    pub closing_balance: MoneyCents,
    pub surplus_months: usize,
    pub deficit_months: usize,
    pub no_data_months: usize,
    pub future_months: usize,
}

/// Realized totals are never negative, so an overflowing sum pins to the maximum.
fn saturating_total(total: MoneyCents, amount: MoneyCents) -> MoneyCents {
    total
        .checked_add(amount)
        .unwrap_or(MoneyCents::new(i64::MAX))
}

pub fn summarize(rows: &[BudgetMonth]) -> YearSummary {
    let mut summary = YearSummary {
        closing_balance: rows
            .iter()
            .max_by_key(|row| row.month)
            .map(|row| row.carried_over_balance)
            .unwrap_or_default(),
        ..Default::default()
    };

    for row in rows {
        summary.total_income = saturating_total(summary.total_income, row.realized_income);
        summary.total_expense = saturating_total(summary.total_expense, row.realized_expense);
        match row.status {
            BudgetStatus::Surplus => summary.surplus_months += 1,
            BudgetStatus::Deficit => summary.deficit_months += 1,
            BudgetStatus::NoData => summary.no_data_months += 1,
            BudgetStatus::Future => summary.future_months += 1,
        }
    }

    summary
}
