//! Monthly aggregation of ledger transactions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{MoneyCents, Transaction, TransactionKind, dates::ledger_year_month};

/// Income and expense recorded in a single month.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthTotals {
    pub income: MoneyCents,
    pub expense: MoneyCents,
}

impl MonthTotals {
    /// Both totals are sums of positive amounts, so the difference fits.
    pub fn net(&self) -> MoneyCents {
        self.income - self.expense
    }
}

/// Sparse per-month totals keyed by month number (`1..=12`). Months without
/// transactions are absent and count as zero downstream.
pub type MonthlyTotals = BTreeMap<u32, MonthTotals>;

/// Groups `transactions` of `year` by month.
///
/// Rows without a parseable date, rows of unknown kind and rows that would
/// overflow their month's total are skipped; a bad row never fails the batch
/// nor lands in another month.
pub fn aggregate(transactions: &[Transaction], year: i32) -> MonthlyTotals {
    let mut totals = MonthlyTotals::new();

    for tx in transactions {
        let Some(raw_date) = tx.date.as_deref() else {
            debug!(transaction_id = %tx.id, "skipping transaction without date");
            continue;
        };
        let Some((tx_year, month)) = ledger_year_month(raw_date) else {
            warn!(
                transaction_id = %tx.id,
                date = raw_date,
                "skipping transaction with unparseable date"
            );
            continue;
        };
        if tx_year != year {
            continue;
        }

        let income = match tx.kind {
            TransactionKind::Income => true,
            TransactionKind::Expense => false,
            TransactionKind::Unknown(ref kind) => {
                warn!(
                    transaction_id = %tx.id,
                    kind = kind.as_str(),
                    "skipping transaction of unknown kind"
                );
                continue;
            }
        };

        let bucket = totals.entry(month).or_default();
        let slot = if income {
            &mut bucket.income
        } else {
            &mut bucket.expense
        };
        match slot.checked_add(tx.amount) {
            Some(sum) => *slot = sum,
            None => warn!(
                transaction_id = %tx.id,
                amount = %tx.amount,
                month,
                "skipping transaction that overflows the month total"
            ),
        }
    }

    totals
}
