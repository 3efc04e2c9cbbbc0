use chrono::{NaiveDate, Utc};

use crate::{
    BudgetMonth, BudgetStore, ComparisonMode, MonthlyComparison, ResultEngine, YearSummary,
    compare::{compare, summarize},
    reallocate::reallocate,
};

use super::Engine;

impl Engine {
    /// Rebuild realized figures, carried-over balances and statuses of a
    /// budget year from the ledger, then persist them in one batch.
    ///
    /// - Returns an empty list when the year has no budget configured.
    /// - Months after the current month are marked `Future`.
    /// - Safe to repeat or race: each run is a full recompute.
    pub async fn reallocate(&self, user_id: &str, year: i32) -> ResultEngine<Vec<BudgetMonth>> {
        self.reallocate_at(user_id, year, Utc::now().date_naive())
            .await
    }

    /// Same as [`Engine::reallocate`] with an explicit calendar date.
    pub async fn reallocate_at(
        &self,
        user_id: &str,
        year: i32,
        today: NaiveDate,
    ) -> ResultEngine<Vec<BudgetMonth>> {
        reallocate(self, self, self.cache.as_ref(), user_id, year, today).await
    }

    /// Snapshot of the stored budget rows of a year.
    pub async fn budget_months(
        &self,
        user_id: &str,
        year: i32,
    ) -> ResultEngine<Vec<BudgetMonth>> {
        self.list_budget_months(user_id, year).await
    }

    /// Compare realized and planned figures of every stored month.
    pub async fn compare_year(
        &self,
        user_id: &str,
        year: i32,
        mode: ComparisonMode,
    ) -> ResultEngine<Vec<MonthlyComparison>> {
        self.compare_year_at(user_id, year, mode, Utc::now().date_naive())
            .await
    }

    pub async fn compare_year_at(
        &self,
        user_id: &str,
        year: i32,
        mode: ComparisonMode,
        today: NaiveDate,
    ) -> ResultEngine<Vec<MonthlyComparison>> {
        let rows = self.list_budget_months(user_id, year).await?;
        Ok(compare(&rows, mode, today))
    }

    pub async fn year_summary(&self, user_id: &str, year: i32) -> ResultEngine<YearSummary> {
        let rows = self.list_budget_months(user_id, year).await?;
        Ok(summarize(&rows))
    }
}
