use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use tracing::warn;
use uuid::Uuid;

use crate::{
    EngineError, LedgerReader, MoneyCents, ResultEngine, Transaction, TransactionKind,
    dates::ledger_year_month, transactions,
};

use super::{Engine, with_tx};

impl LedgerReader for Engine {
    async fn list_transactions(
        &self,
        user_id: &str,
        year: Option<i32>,
    ) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::UserId.eq(user_id))
            .order_by_asc(transactions::Column::Id)
            .all(&self.database)
            .await?;

        let rows = models.into_iter().map(Transaction::from);
        let Some(year) = year else {
            return Ok(rows.collect());
        };

        Ok(rows
            .filter(|tx| match tx.date.as_deref().map(ledger_year_month) {
                Some(Some((tx_year, _))) => tx_year == year,
                Some(None) => {
                    warn!(
                        transaction_id = %tx.id,
                        date = tx.date.as_deref().unwrap_or_default(),
                        "dropping ledger row with unparseable date"
                    );
                    false
                }
                None => false,
            })
            .collect())
    }
}

impl Engine {
    /// Return a single transaction of the user.
    pub async fn transaction(&self, user_id: &str, id: Uuid) -> ResultEngine<Transaction> {
        let model = transactions::Entity::find_by_id(id)
            .filter(transactions::Column::UserId.eq(user_id))
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("transaction not exists".to_string()))?;
        Ok(Transaction::from(model))
    }

    /// Record a new transaction and return its id.
    ///
    /// Reallocation is not run here; callers notify a
    /// [`RecomputeTrigger`](crate::RecomputeTrigger).
    pub async fn record_transaction(
        &self,
        user_id: &str,
        kind: TransactionKind,
        amount: MoneyCents,
        date: Option<&str>,
    ) -> ResultEngine<Uuid> {
        let tx = Transaction::new(user_id, kind, amount, date)?;
        transactions::ActiveModel::from(&tx)
            .insert(&self.database)
            .await?;
        Ok(tx.id)
    }

    /// Change kind, amount and date of an existing transaction.
    pub async fn update_transaction(
        &self,
        user_id: &str,
        id: Uuid,
        kind: TransactionKind,
        amount: MoneyCents,
        date: Option<&str>,
    ) -> ResultEngine<Transaction> {
        let mut updated = Transaction::new(user_id, kind, amount, date)?;
        updated.id = id;

        with_tx!(self, |db_tx| {
            let exists = transactions::Entity::find_by_id(id)
                .filter(transactions::Column::UserId.eq(user_id))
                .one(&db_tx)
                .await?
                .is_some();
            if !exists {
                return Err(EngineError::KeyNotFound("transaction not exists".to_string()));
            }

            let model = transactions::ActiveModel {
                id: ActiveValue::Unchanged(id),
                kind: ActiveValue::Set(updated.kind.as_str().to_string()),
                amount_minor: ActiveValue::Set(updated.amount.cents()),
                occurred_on: ActiveValue::Set(updated.date.clone()),
                ..Default::default()
            };
            model.update(&db_tx).await?;
            Ok(updated)
        })
    }

    /// Delete a transaction of the user.
    pub async fn delete_transaction(&self, user_id: &str, id: Uuid) -> ResultEngine<()> {
        let result = transactions::Entity::delete_many()
            .filter(transactions::Column::Id.eq(id))
            .filter(transactions::Column::UserId.eq(user_id))
            .exec(&self.database)
            .await?;
        if result.rows_affected == 0 {
            return Err(EngineError::KeyNotFound("transaction not exists".to_string()));
        }
        Ok(())
    }
}
