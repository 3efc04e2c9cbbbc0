//! Carry-over reallocation.
//!
//! Walks the budget months of a year in order and rebuilds the realized
//! figures from the ledger. Each month's carried-over balance is its own net
//! plus the previous month's carried-over balance, so the last month holds
//! the cumulative cash position of the year.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, info};

use crate::{
    BudgetMonth, BudgetStatus, CacheInvalidator, EngineError, MoneyCents, ResultEngine,
    aggregate::{MonthlyTotals, aggregate},
    ports::{BudgetStore, LedgerReader},
};

/// Whether `(year, month)` lies after the calendar month of `today`.
pub fn is_future_month(year: i32, month: u32, today: NaiveDate) -> bool {
    (year, month) > (today.year(), today.month())
}

/// Status of a month from its own net.
pub fn classify_month(year: i32, month: u32, net: MoneyCents, today: NaiveDate) -> BudgetStatus {
    if is_future_month(year, month, today) {
        BudgetStatus::Future
    } else {
        BudgetStatus::from_sign(net)
    }
}

/// Recompute realized figures of `rows` from `totals`.
///
/// `rows` may come in any order; the result is ordered by month. Planned
/// figures are carried through untouched.
///
/// Fails with [`EngineError::InvalidAmount`] when the running balance leaves
/// the representable range.
pub fn carry_over(
    mut rows: Vec<BudgetMonth>,
    totals: &MonthlyTotals,
    today: NaiveDate,
) -> ResultEngine<Vec<BudgetMonth>> {
    rows.sort_by_key(|row| row.month);

    let mut carried = MoneyCents::ZERO;
    for row in &mut rows {
        let month_totals = totals.get(&row.month).copied().unwrap_or_default();
        let net = month_totals.net();
        carried = carried.checked_add(net).ok_or_else(|| {
            EngineError::InvalidAmount(format!(
                "carried-over balance of {}-{:02} overflows",
                row.year, row.month
            ))
        })?;

        row.realized_income = month_totals.income;
        row.realized_expense = month_totals.expense;
        row.carried_over_balance = carried;
        row.status = classify_month(row.year, row.month, net, today);
    }

    Ok(rows)
}

/// Reallocate a year for a user against the given collaborators.
///
/// A year without budget rows returns an empty list and performs no write.
/// On a storage failure nothing is committed and the cache is left alone.
pub async fn reallocate<L, B>(
    ledger: &L,
    budgets: &B,
    cache: &dyn CacheInvalidator,
    user_id: &str,
    year: i32,
    today: NaiveDate,
) -> ResultEngine<Vec<BudgetMonth>>
where
    L: LedgerReader,
    B: BudgetStore,
{
    let rows = budgets.list_budget_months(user_id, year).await?;
    if rows.is_empty() {
        debug!(user_id, year, "no budget configured, nothing to reallocate");
        return Ok(Vec::new());
    }

    let transactions = ledger.list_transactions(user_id, Some(year)).await?;
    let totals = aggregate(&transactions, year);
    let rows = carry_over(rows, &totals, today)?;

    budgets.upsert_budget_months(user_id, year, &rows).await?;
    cache.invalidate(user_id, year);

    info!(
        user_id,
        year,
        months = rows.len(),
        transactions = transactions.len(),
        closing_balance = %rows.last().map(|r| r.carried_over_balance).unwrap_or_default(),
        "budget year reallocated"
    );
    Ok(rows)
}
