//! Per-month budget rows.
//!
//! One row exists per `(user_id, year, month)`. Planned figures are written
//! by budget setup and planning; realized figures, the carried-over balance
//! and the status are written only by reallocation.

use std::fmt;

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{EngineError, MoneyCents, ResultEngine};

/// Classification of a budget month.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetStatus {
    /// Observed month whose net (or gap) is exactly zero.
    #[default]
    NoData,
    Surplus,
    Deficit,
    /// Month after the current calendar month.
    Future,
}

impl BudgetStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoData => "no_data",
            Self::Surplus => "surplus",
            Self::Deficit => "deficit",
            Self::Future => "future",
        }
    }

    /// Status of an observed month from the sign of an amount.
    pub fn from_sign(amount: MoneyCents) -> Self {
        if amount.is_positive() {
            Self::Surplus
        } else if amount.is_negative() {
            Self::Deficit
        } else {
            Self::NoData
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for BudgetStatus {
    type Error = EngineError;

    /// Accepts the canonical names and the legacy `padrao`/`excedente`/
    /// `deficit`/`futuro` labels.
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_lowercase().as_str() {
            "no_data" | "padrao" => Ok(Self::NoData),
            "surplus" | "excedente" => Ok(Self::Surplus),
            "deficit" => Ok(Self::Deficit),
            "future" | "futuro" => Ok(Self::Future),
            _ => Err(EngineError::InvalidStatus(value.to_string())),
        }
    }
}

/// Validate a month number.
pub fn check_month(month: u32) -> ResultEngine<u32> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(EngineError::InvalidMonth(month))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetMonth {
    pub user_id: String,
    pub year: i32,
    pub month: u32,
    pub planned_income: MoneyCents,
    pub planned_expense: MoneyCents,
    pub realized_income: MoneyCents,
    pub realized_expense: MoneyCents,
    pub carried_over_balance: MoneyCents,
    pub status: BudgetStatus,
}

impl BudgetMonth {
    /// A freshly configured month with nothing realized yet.
    pub fn planned(
        user_id: &str,
        year: i32,
        month: u32,
        planned_income: MoneyCents,
        planned_expense: MoneyCents,
    ) -> ResultEngine<Self> {
        Ok(Self {
            user_id: user_id.to_string(),
            year,
            month: check_month(month)?,
            planned_income,
            planned_expense,
            realized_income: MoneyCents::ZERO,
            realized_expense: MoneyCents::ZERO,
            carried_over_balance: MoneyCents::ZERO,
            status: BudgetStatus::NoData,
        })
    }

    /// Planned net for the month. Simple budgets store their single amount
    /// as planned income.
    pub fn planned_amount(&self) -> MoneyCents {
        self.planned_income - self.planned_expense
    }

    /// Realized net for this month alone, without carry-over.
    pub fn net(&self) -> MoneyCents {
        self.realized_income - self.realized_expense
    }

    /// Whether any transaction was aggregated into this month.
    pub fn has_transactions(&self) -> bool {
        !self.realized_income.is_zero() || !self.realized_expense.is_zero()
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budget_months")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub user_id: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub year: i32,
    #[sea_orm(primary_key, auto_increment = false)]
    pub month: i32,
    pub planned_income: i64,
    pub planned_expense: i64,
    pub realized_income: i64,
    pub realized_expense: i64,
    pub carried_over_balance: i64,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&BudgetMonth> for ActiveModel {
    fn from(row: &BudgetMonth) -> Self {
        Self {
            user_id: ActiveValue::Set(row.user_id.clone()),
            year: ActiveValue::Set(row.year),
            month: ActiveValue::Set(row.month as i32),
            planned_income: ActiveValue::Set(row.planned_income.cents()),
            planned_expense: ActiveValue::Set(row.planned_expense.cents()),
            realized_income: ActiveValue::Set(row.realized_income.cents()),
            realized_expense: ActiveValue::Set(row.realized_expense.cents()),
            carried_over_balance: ActiveValue::Set(row.carried_over_balance.cents()),
            status: ActiveValue::Set(row.status.as_str().to_string()),
        }
    }
}

impl TryFrom<Model> for BudgetMonth {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let month = u32::try_from(model.month)
            .ok()
            .and_then(|m| check_month(m).ok())
            .ok_or(EngineError::InvalidMonth(model.month.max(0) as u32))?;
        let status = BudgetStatus::try_from(model.status.as_str()).unwrap_or_else(|_| {
            warn!(
                user_id = %model.user_id,
                year = model.year,
                month,
                status = %model.status,
                "unknown budget status, normalizing to no_data"
            );
            BudgetStatus::NoData
        });
        Ok(Self {
            user_id: model.user_id,
            year: model.year,
            month,
            planned_income: MoneyCents::new(model.planned_income),
            planned_expense: MoneyCents::new(model.planned_expense),
            realized_income: MoneyCents::new(model.realized_income),
            realized_expense: MoneyCents::new(model.realized_expense),
            carried_over_balance: MoneyCents::new(model.carried_over_balance),
            status,
        })
    }
}
