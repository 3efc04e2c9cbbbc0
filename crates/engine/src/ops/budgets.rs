use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::{
    ActiveValue, PaginatorTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    BudgetMonth, BudgetStore, EngineError, MoneyCents, ResultEngine, budget_months,
    budget_months::check_month, reallocate::classify_month,
};

use super::{Engine, with_tx};

/// Planned figures applied to every month of a new budget year.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyPlan {
    pub income: MoneyCents,
    pub expense: MoneyCents,
}

impl MonthlyPlan {
    /// A simple budget with a single planned amount.
    pub fn simple(amount: MoneyCents) -> Self {
        Self {
            income: amount,
            expense: MoneyCents::ZERO,
        }
    }
}

/// First month a new budget year starts from: the current month for the
/// current year, January otherwise.
fn default_first_month(year: i32, today: NaiveDate) -> u32 {
    if year == today.year() {
        today.month()
    } else {
        1
    }
}

impl BudgetStore for Engine {
    async fn list_budget_months(
        &self,
        user_id: &str,
        year: i32,
    ) -> ResultEngine<Vec<BudgetMonth>> {
        budget_months::Entity::find()
            .filter(budget_months::Column::UserId.eq(user_id))
            .filter(budget_months::Column::Year.eq(year))
            .order_by_asc(budget_months::Column::Month)
            .all(&self.database)
            .await?
            .into_iter()
            .map(BudgetMonth::try_from)
            .collect()
    }

    async fn upsert_budget_months(
        &self,
        user_id: &str,
        year: i32,
        rows: &[BudgetMonth],
    ) -> ResultEngine<()> {
        if rows.is_empty() {
            return Ok(());
        }

        // Only realized columns of rows that still exist are written. Planned
        // columns belong to budget planning, and a row deleted with its budget
        // year while a recompute was in flight must stay deleted.
        with_tx!(self, |db_tx| {
            let mut skipped = 0_usize;
            for row in rows {
                let result = budget_months::Entity::update_many()
                    .col_expr(
                        budget_months::Column::RealizedIncome,
                        Expr::value(row.realized_income.cents()),
                    )
                    .col_expr(
                        budget_months::Column::RealizedExpense,
                        Expr::value(row.realized_expense.cents()),
                    )
                    .col_expr(
                        budget_months::Column::CarriedOverBalance,
                        Expr::value(row.carried_over_balance.cents()),
                    )
                    .col_expr(
                        budget_months::Column::Status,
                        Expr::value(row.status.as_str()),
                    )
                    .filter(budget_months::Column::UserId.eq(user_id))
                    .filter(budget_months::Column::Year.eq(year))
                    .filter(budget_months::Column::Month.eq(row.month as i32))
                    .exec(&db_tx)
                    .await?;
                if result.rows_affected == 0 {
                    skipped += 1;
                }
            }
            if skipped > 0 {
                debug!(user_id, year, skipped, "budget months vanished before write");
            }
            Ok(())
        })
    }
}

impl Engine {
    /// Create the budget rows of a year, one per month from `from_month`
    /// through December.
    ///
    /// Without `from_month` the year starts at the current month when `year`
    /// is the current year, in January otherwise.
    pub async fn setup_budget_year(
        &self,
        user_id: &str,
        year: i32,
        plan: MonthlyPlan,
        from_month: Option<u32>,
    ) -> ResultEngine<Vec<BudgetMonth>> {
        self.setup_budget_year_at(user_id, year, plan, from_month, Utc::now().date_naive())
            .await
    }

    /// Same as [`Engine::setup_budget_year`] with an explicit calendar date.
    pub async fn setup_budget_year_at(
        &self,
        user_id: &str,
        year: i32,
        plan: MonthlyPlan,
        from_month: Option<u32>,
        today: NaiveDate,
    ) -> ResultEngine<Vec<BudgetMonth>> {
        let first = from_month.unwrap_or_else(|| default_first_month(year, today));
        let first = check_month(first)?;

        let rows = (first..=12)
            .map(|month| {
                let mut row =
                    BudgetMonth::planned(user_id, year, month, plan.income, plan.expense)?;
                row.status = classify_month(year, month, MoneyCents::ZERO, today);
                Ok(row)
            })
            .collect::<ResultEngine<Vec<_>>>()?;

        with_tx!(self, |db_tx| {
            let existing = budget_months::Entity::find()
                .filter(budget_months::Column::UserId.eq(user_id))
                .filter(budget_months::Column::Year.eq(year))
                .count(&db_tx)
                .await?;
            if existing > 0 {
                return Err(EngineError::ExistingKey(format!("budget {year} of {user_id}")));
            }

            budget_months::Entity::insert_many(rows.iter().map(budget_months::ActiveModel::from))
                .exec_without_returning(&db_tx)
                .await?;
            Ok(rows)
        })
    }

    /// Change the planned figures of one month. Realized figures are left to
    /// reallocation.
    pub async fn set_planned(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
        planned_income: MoneyCents,
        planned_expense: MoneyCents,
    ) -> ResultEngine<BudgetMonth> {
        let month = check_month(month)?;
        let model = budget_months::ActiveModel {
            user_id: ActiveValue::Unchanged(user_id.to_string()),
            year: ActiveValue::Unchanged(year),
            month: ActiveValue::Unchanged(month as i32),
            planned_income: ActiveValue::Set(planned_income.cents()),
            planned_expense: ActiveValue::Set(planned_expense.cents()),
            ..Default::default()
        };

        match model.update(&self.database).await {
            Ok(model) => BudgetMonth::try_from(model),
            Err(DbErr::RecordNotUpdated) => Err(EngineError::KeyNotFound(format!(
                "budget month {year}-{month:02}"
            ))),
            Err(err) => Err(err.into()),
        }
    }

    /// Delete every budget row of a year. Returns how many rows were removed.
    pub async fn delete_budget_year(&self, user_id: &str, year: i32) -> ResultEngine<u64> {
        let result = budget_months::Entity::delete_many()
            .filter(budget_months::Column::UserId.eq(user_id))
            .filter(budget_months::Column::Year.eq(year))
            .exec(&self.database)
            .await?;
        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_first_month_follows_calendar() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        assert_eq!(default_first_month(2025, today), 6);
        assert_eq!(default_first_month(2026, today), 1);
        assert_eq!(default_first_month(2024, today), 1);
    }
}
