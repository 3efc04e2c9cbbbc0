//! Initial schema.
//!
//! - `transactions`: the ledger, one row per income or expense
//! - `budget_months`: planned and realized figures per user, year and month

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    UserId,
    Kind,
    AmountMinor,
    OccurredOn,
}

#[derive(Iden)]
enum BudgetMonths {
    Table,
    UserId,
    Year,
    Month,
    PlannedIncome,
    PlannedExpense,
    RealizedIncome,
    RealizedExpense,
    CarriedOverBalance,
    Status,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Transactions
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::UserId).string().not_null())
                    .col(ColumnDef::new(Transactions::Kind).string().not_null())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    // Free text: entry flows write `dd/mm/yyyy` or ISO timestamps.
                    .col(ColumnDef::new(Transactions::OccurredOn).string())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-user_id")
                    .table(Transactions::Table)
                    .col(Transactions::UserId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Budget months
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(BudgetMonths::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(BudgetMonths::UserId).string().not_null())
                    .col(ColumnDef::new(BudgetMonths::Year).integer().not_null())
                    .col(ColumnDef::new(BudgetMonths::Month).integer().not_null())
                    .col(
                        ColumnDef::new(BudgetMonths::PlannedIncome)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BudgetMonths::PlannedExpense)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BudgetMonths::RealizedIncome)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BudgetMonths::RealizedExpense)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BudgetMonths::CarriedOverBalance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(BudgetMonths::Status)
                            .string()
                            .not_null()
                            .default("no_data"),
                    )
                    .primary_key(
                        Index::create()
                            .col(BudgetMonths::UserId)
                            .col(BudgetMonths::Year)
                            .col(BudgetMonths::Month),
                    )
                    .check(
                        Expr::col(BudgetMonths::Month)
                            .gte(1)
                            .and(Expr::col(BudgetMonths::Month).lte(12)),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BudgetMonths::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        Ok(())
    }
}
