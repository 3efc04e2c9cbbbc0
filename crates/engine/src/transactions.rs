//! Ledger transaction primitives.
//!
//! A `Transaction` is a single income or expense recorded by a user. The
//! ledger keeps the textual date and the raw kind exactly as the entry flow
//! wrote them; interpretation happens when the ledger is read.

use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
    /// A kind the engine does not understand. Kept so the row can be
    /// reported, ignored by aggregation.
    Unknown(String),
}

impl TransactionKind {
    /// Interprets a stored kind. Accepts the English names and the
    /// `receita`/`despesa` labels, case-insensitively.
    pub fn from_raw(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "income" | "receita" => Self::Income,
            "expense" | "despesa" => Self::Expense,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
            Self::Unknown(raw) => raw.as_str(),
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount: MoneyCents,
    /// Textual date; `None` when the entry flow stored no date.
    pub date: Option<String>,
}

impl Transaction {
    /// Build a new transaction for the ledger.
    ///
    /// Only known kinds and strictly positive amounts can be recorded.
    pub fn new(
        user_id: &str,
        kind: TransactionKind,
        amount: MoneyCents,
        date: Option<&str>,
    ) -> ResultEngine<Self> {
        if !kind.is_known() {
            return Err(EngineError::InvalidKind(kind.as_str().to_string()));
        }
        if !amount.is_positive() {
            return Err(EngineError::InvalidAmount(
                "amount must be > 0".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            kind,
            amount,
            date: normalize_date(date),
        })
    }
}

fn normalize_date(date: Option<&str>) -> Option<String> {
    date.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: String,
    pub kind: String,
    pub amount_minor: i64,
    pub occurred_on: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount.cents()),
            occurred_on: ActiveValue::Set(tx.date.clone()),
        }
    }
}

impl From<Model> for Transaction {
    /// Normalizes a stored row. Negative stored amounts are read as their
    /// absolute value; the kind decides the direction.
    fn from(model: Model) -> Self {
        if model.amount_minor < 0 {
            warn!(
                transaction_id = %model.id,
                amount_minor = model.amount_minor,
                "negative amount stored on ledger row, using absolute value"
            );
        }
        Self {
            id: model.id,
            user_id: model.user_id,
            kind: TransactionKind::from_raw(&model.kind),
            amount: MoneyCents::new(model.amount_minor.saturating_abs()),
            date: normalize_date(model.occurred_on.as_deref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_accepts_labels_in_any_case() {
        assert_eq!(TransactionKind::from_raw("receita"), TransactionKind::Income);
        assert_eq!(TransactionKind::from_raw(" Despesa "), TransactionKind::Expense);
        assert_eq!(TransactionKind::from_raw("INCOME"), TransactionKind::Income);
        assert_eq!(
            TransactionKind::from_raw("transfer"),
            TransactionKind::Unknown("transfer".to_string())
        );
    }

    #[test]
    fn new_rejects_unknown_kind_and_non_positive_amounts() {
        let unknown = Transaction::new(
            "alice",
            TransactionKind::Unknown("gift".to_string()),
            MoneyCents::new(100),
            None,
        );
        assert_eq!(unknown, Err(EngineError::InvalidKind("gift".to_string())));

        let zero = Transaction::new("alice", TransactionKind::Income, MoneyCents::ZERO, None);
        assert!(matches!(zero, Err(EngineError::InvalidAmount(_))));
    }

    #[test]
    fn blank_dates_are_normalized_to_none() {
        let tx = Transaction::new(
            "alice",
            TransactionKind::Expense,
            MoneyCents::new(500),
            Some("  "),
        )
        .unwrap();
        assert_eq!(tx.date, None);
    }

    #[test]
    fn model_conversion_uses_absolute_amount() {
        let model = Model {
            id: Uuid::new_v4(),
            user_id: "alice".to_string(),
            kind: "despesa".to_string(),
            amount_minor: -2500,
            occurred_on: Some(" 10/01/2025 ".to_string()),
        };
        let tx = Transaction::from(model);
        assert_eq!(tx.kind, TransactionKind::Expense);
        assert_eq!(tx.amount, MoneyCents::new(2500));
        assert_eq!(tx.date.as_deref(), Some("10/01/2025"));
    }
}
