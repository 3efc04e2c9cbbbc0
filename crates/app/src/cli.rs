use clap::{Args, Parser, Subcommand};
use engine::{ComparisonMode, MoneyCents, TransactionKind};
use uuid::Uuid;

#[derive(Parser, Debug)]
#[command(name = "carryover")]
#[command(about = "Monthly budget reallocation with carried-over balances")]
pub struct Cli {
    /// Optional settings file (TOML).
    #[arg(long)]
    pub config: Option<String>,

    /// Database connection string, overrides the settings file.
    #[arg(long, env = "DATABASE_URL")]
    pub database_url: Option<String>,

    /// Owner of the ledger and of the budget.
    #[arg(long, env = "CARRYOVER_USER")]
    pub user: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record, change or remove ledger transactions.
    Tx(Tx),
    /// Plan a budget year.
    Budget(Budget),
    /// Recompute realized figures and carried-over balances of a year.
    Recompute(YearArgs),
    /// Planned against realized, month by month.
    Compare(CompareArgs),
    /// Totals and month counts of a year.
    Summary(YearArgs),
}

#[derive(Args, Debug)]
pub struct Tx {
    #[command(subcommand)]
    pub command: TxCommand,
}

#[derive(Subcommand, Debug)]
pub enum TxCommand {
    Add(TxFields),
    Update {
        #[arg(long)]
        id: Uuid,
        #[command(flatten)]
        fields: TxFields,
    },
    Delete {
        #[arg(long)]
        id: Uuid,
    },
}

#[derive(Args, Debug)]
pub struct TxFields {
    /// `income` or `expense`.
    #[arg(long, value_parser = parse_kind)]
    pub kind: TransactionKind,
    /// Positive amount, e.g. `1.234,56` or `12.50`.
    #[arg(long, allow_hyphen_values = true)]
    pub amount: MoneyCents,
    /// `dd/mm/yyyy` or an ISO date.
    #[arg(long)]
    pub date: Option<String>,
}

#[derive(Args, Debug)]
pub struct Budget {
    #[command(subcommand)]
    pub command: BudgetCommand,
}

#[derive(Subcommand, Debug)]
pub enum BudgetCommand {
    /// Create one row per month through December.
    Init {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long, default_value_t = MoneyCents::ZERO)]
        income: MoneyCents,
        #[arg(long, default_value_t = MoneyCents::ZERO)]
        expense: MoneyCents,
        /// First month of the budget (1-12).
        #[arg(long)]
        from_month: Option<u32>,
    },
    /// Change the planned figures of one month.
    Plan {
        #[arg(long)]
        year: Option<i32>,
        #[arg(long)]
        month: u32,
        #[arg(long, default_value_t = MoneyCents::ZERO)]
        income: MoneyCents,
        #[arg(long, default_value_t = MoneyCents::ZERO)]
        expense: MoneyCents,
    },
    Delete(YearArgs),
    Show(YearArgs),
}

#[derive(Args, Debug)]
pub struct YearArgs {
    /// Budget year, the current one when omitted.
    #[arg(long)]
    pub year: Option<i32>,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    #[arg(long)]
    pub year: Option<i32>,
    /// `with` (carried-over balance) or `without` (month in isolation).
    #[arg(long, default_value = "with")]
    pub mode: ComparisonMode,
}

fn parse_kind(raw: &str) -> Result<TransactionKind, String> {
    let kind = TransactionKind::from_raw(raw);
    if kind.is_known() {
        Ok(kind)
    } else {
        Err(format!("unsupported kind: {raw}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tx_add() {
        let cli = Cli::try_parse_from([
            "carryover", "--user", "ana", "tx", "add", "--kind", "despesa", "--amount", "12,50",
            "--date", "03/02/2025",
        ])
        .unwrap();

        assert_eq!(cli.user, "ana");
        let Command::Tx(Tx {
            command: TxCommand::Add(fields),
        }) = cli.command
        else {
            panic!("expected tx add");
        };
        assert_eq!(fields.kind, TransactionKind::Expense);
        assert_eq!(fields.amount, MoneyCents::new(1250));
        assert_eq!(fields.date.as_deref(), Some("03/02/2025"));
    }

    #[test]
    fn rejects_unknown_kind() {
        let result = Cli::try_parse_from([
            "carryover", "--user", "ana", "tx", "add", "--kind", "transfer", "--amount", "1",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn compare_mode_defaults_to_carry_over() {
        let cli =
            Cli::try_parse_from(["carryover", "--user", "ana", "compare", "--year", "2025"])
                .unwrap();
        let Command::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(args.year, Some(2025));
        assert_eq!(args.mode, ComparisonMode::WithCarryOver);
    }

    #[test]
    fn budget_init_defaults_plan_to_zero() {
        let cli = Cli::try_parse_from([
            "carryover", "--user", "ana", "budget", "init", "--year", "2025", "--income", "1000",
        ])
        .unwrap();
        let Command::Budget(Budget {
            command:
                BudgetCommand::Init {
                    year,
                    income,
                    expense,
                    from_month,
                },
        }) = cli.command
        else {
            panic!("expected budget init");
        };
        assert_eq!(year, Some(2025));
        assert_eq!(income, MoneyCents::new(100_000));
        assert_eq!(expense, MoneyCents::ZERO);
        assert_eq!(from_month, None);
    }
}
