use std::{fmt, sync::Arc};

use sea_orm::DatabaseConnection;

use crate::{CacheInvalidator, NoopCache, ResultEngine};

mod budgets;
mod ledger;
mod reallocation;

pub use budgets::MonthlyPlan;

/// Run a block inside a DB transaction, committing on success and rolling back on error.
macro_rules! with_tx {
    ($self:expr, |$tx:ident| $body:expr) => {{
        let $tx = $self.database.begin().await?;
        let result = $body;
        match result {
            Ok(value) => {
                $tx.commit().await?;
                Ok(value)
            }
            Err(err) => Err(err),
        }
    }};
}

pub(crate) use with_tx;

/// Database backed engine.
///
/// Implements [`LedgerReader`](crate::LedgerReader) and
/// [`BudgetStore`](crate::BudgetStore) over its connection and exposes
/// reallocation, comparison and budget planning on top of them.
pub struct Engine {
    database: DatabaseConnection,
    cache: Arc<dyn CacheInvalidator>,
}

impl Engine {
    /// Return a builder for `Engine`. Help to build the struct.
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}

/// The builder for `Engine`
#[derive(Default)]
pub struct EngineBuilder {
    database: DatabaseConnection,
    cache: Option<Arc<dyn CacheInvalidator>>,
}

impl EngineBuilder {
    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> EngineBuilder {
        self.database = db;
        self
    }

    /// Cache to invalidate after each committed reallocation. Defaults to
    /// [`NoopCache`].
    pub fn cache(mut self, cache: Arc<dyn CacheInvalidator>) -> EngineBuilder {
        self.cache = Some(cache);
        self
    }

    /// Construct `Engine`
    pub async fn build(self) -> ResultEngine<Engine> {
        Ok(Engine {
            database: self.database,
            cache: self.cache.unwrap_or_else(|| Arc::new(NoopCache)),
        })
    }
}
