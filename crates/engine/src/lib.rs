//! Cash-flow reallocation engine.
//!
//! Given a user's ledger and the planned budget of a year, the engine
//! computes realized monthly figures, a carried-over balance chained across
//! months, and a status per month. Dashboards read the result through
//! [`compare`] and [`summarize`].
//!
//! The pure parts ([`aggregate`], [`carry_over`], [`compare`]) work on plain
//! records. [`reallocate`] ties them to the [`LedgerReader`] and
//! [`BudgetStore`] ports, which [`Engine`] implements on a sea-orm database.

pub use aggregate::{MonthTotals, MonthlyTotals, aggregate};
pub use budget_months::{BudgetMonth, BudgetStatus};
pub use compare::{
    ComparisonMode, GapPercentage, MonthlyComparison, YearSummary, compare, compare_month,
    summarize,
};
pub use dates::parse_ledger_date;
pub use error::EngineError;
pub use money::MoneyCents;
pub use ops::{Engine, EngineBuilder, MonthlyPlan};
pub use ports::{BudgetStore, CacheInvalidator, LedgerReader, NoopCache};
pub use reallocate::{carry_over, classify_month, is_future_month, reallocate};
pub use transactions::{Transaction, TransactionKind};
pub use trigger::{RecomputeHandle, RecomputeTrigger};

mod aggregate;
mod budget_months;
mod compare;
mod dates;
mod error;
mod money;
mod ops;
mod ports;
mod reallocate;
mod transactions;
mod trigger;

type ResultEngine<T> = Result<T, EngineError>;
