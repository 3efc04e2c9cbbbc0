//! Collaborator contracts used by reallocation.
//!
//! [`Engine`](crate::Engine) implements the ledger and budget ports on top of
//! its database; tests and embedders can provide their own.

use std::future::Future;

use crate::{BudgetMonth, ResultEngine, Transaction};

/// Read access to a user's ledger.
pub trait LedgerReader: Send + Sync {
    /// List the user's transactions. With `year` set, only rows whose date
    /// falls in that year are returned; rows with unreadable dates are
    /// dropped in that case.
    fn list_transactions(
        &self,
        user_id: &str,
        year: Option<i32>,
    ) -> impl Future<Output = ResultEngine<Vec<Transaction>>> + Send;
}

/// Storage of per-month budget rows.
pub trait BudgetStore: Send + Sync {
    /// Rows of `(user_id, year)` ordered by month ascending.
    fn list_budget_months(
        &self,
        user_id: &str,
        year: i32,
    ) -> impl Future<Output = ResultEngine<Vec<BudgetMonth>>> + Send;

    /// Write realized figures, carried-over balances and statuses of `rows`
    /// as one atomic batch. Planned figures are left alone, and rows that no
    /// longer exist are skipped rather than recreated.
    fn upsert_budget_months(
        &self,
        user_id: &str,
        year: i32,
        rows: &[BudgetMonth],
    ) -> impl Future<Output = ResultEngine<()>> + Send;
}

/// Invalidation hook for whatever caches dashboard reads.
///
/// Called after a reallocation batch has been committed.
pub trait CacheInvalidator: Send + Sync {
    fn invalidate(&self, user_id: &str, year: i32);
}

/// Cache port for deployments without a cache.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopCache;

impl CacheInvalidator for NoopCache {
    fn invalidate(&self, _user_id: &str, _year: i32) {}
}
