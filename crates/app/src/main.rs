use std::{collections::BTreeSet, sync::Arc};

use chrono::{Datelike, Utc};
use clap::Parser;
use engine::{Engine, MonthlyPlan, RecomputeTrigger, parse_ledger_date};
use migration::{Migrator, MigratorTrait};
use serde::Serialize;
use serde_json::json;

use cli::{BudgetCommand, Cli, Command, TxCommand};
use error::Result;
use settings::Settings;

mod cli;
mod error;
mod settings;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::new(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "carryover={level},engine={level}",
            level = settings.app.level
        ))
        .with_writer(std::io::stderr)
        .init();

    let url = cli
        .database_url
        .clone()
        .unwrap_or_else(|| settings.database.url());
    let database = connect(&url).await?;
    let engine = Arc::new(Engine::builder().database(database).build().await?);

    run(cli, engine).await
}

async fn connect(url: &str) -> Result<sea_orm::DatabaseConnection> {
    tracing::debug!("connecting to {url}");
    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    Ok(database)
}

fn current_year(year: Option<i32>) -> i32 {
    year.unwrap_or_else(|| Utc::now().year())
}

/// Distinct years of `dates`. `None` stands for an unreadable or missing
/// date and resolves to the current year in the trigger.
fn recompute_years(dates: &[Option<String>]) -> BTreeSet<Option<i32>> {
    dates
        .iter()
        .map(|date| {
            date.as_deref()
                .and_then(parse_ledger_date)
                .map(|date| date.year())
        })
        .collect()
}

fn print<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

async fn run(cli: Cli, engine: Arc<Engine>) -> Result<()> {
    let user = cli.user;

    match cli.command {
        Command::Tx(tx) => {
            let trigger = RecomputeTrigger::new(Arc::clone(&engine));
            // Dates whose year lost or gained a transaction.
            let touched = match tx.command {
                TxCommand::Add(fields) => {
                    let date = fields.date.as_deref();
                    let id = engine
                        .record_transaction(&user, fields.kind, fields.amount, date)
                        .await?;
                    print(&json!({ "id": id }))?;
                    vec![fields.date]
                }
                TxCommand::Update { id, fields } => {
                    let previous = engine.transaction(&user, id).await?;
                    let updated = engine
                        .update_transaction(
                            &user,
                            id,
                            fields.kind,
                            fields.amount,
                            fields.date.as_deref(),
                        )
                        .await?;
                    print(&updated)?;
                    vec![previous.date, updated.date]
                }
                TxCommand::Delete { id } => {
                    let removed = engine.transaction(&user, id).await?;
                    engine.delete_transaction(&user, id).await?;
                    print(&json!({ "deleted": id }))?;
                    vec![removed.date]
                }
            };

            // The process would exit before a detached recompute commits.
            // Failures are already logged by the trigger.
            for year in recompute_years(&touched) {
                let handle = match year {
                    Some(year) => trigger.spawn(&user, year),
                    None => trigger.transaction_changed(&user),
                };
                if let Err(err) = handle.await? {
                    tracing::debug!("recompute skipped: {err}");
                }
            }
        }
        Command::Budget(budget) => match budget.command {
            BudgetCommand::Init {
                year,
                income,
                expense,
                from_month,
            } => {
                let plan = MonthlyPlan { income, expense };
                let rows = engine
                    .setup_budget_year(&user, current_year(year), plan, from_month)
                    .await?;
                print(&rows)?;
            }
            BudgetCommand::Plan {
                year,
                month,
                income,
                expense,
            } => {
                let row = engine
                    .set_planned(&user, current_year(year), month, income, expense)
                    .await?;
                print(&row)?;
            }
            BudgetCommand::Delete(args) => {
                let year = current_year(args.year);
                let deleted = engine.delete_budget_year(&user, year).await?;
                print(&json!({ "year": year, "deleted": deleted }))?;
            }
            BudgetCommand::Show(args) => {
                let rows = engine.budget_months(&user, current_year(args.year)).await?;
                print(&rows)?;
            }
        },
        Command::Recompute(args) => {
            let rows = engine.reallocate(&user, current_year(args.year)).await?;
            print(&rows)?;
        }
        Command::Compare(args) => {
            let rows = engine
                .compare_year(&user, current_year(args.year), args.mode)
                .await?;
            print(&rows)?;
        }
        Command::Summary(args) => {
            let summary = engine.year_summary(&user, current_year(args.year)).await?;
            print(&summary)?;
        }
    }

    Ok(())
}
