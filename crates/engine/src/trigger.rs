//! Background recompute after ledger mutations.
//!
//! Mutation handlers fire a recompute and return immediately. Readers may
//! observe the previous state until the spawned task commits.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::{BudgetMonth, Engine, ResultEngine};

/// Handle of a spawned reallocation.
pub type RecomputeHandle = JoinHandle<ResultEngine<Vec<BudgetMonth>>>;

#[derive(Clone, Debug)]
pub struct RecomputeTrigger {
    engine: Arc<Engine>,
}

impl RecomputeTrigger {
    pub fn new(engine: Arc<Engine>) -> Self {
        Self { engine }
    }

    /// Notify that a transaction of `user_id` was created, updated or
    /// deleted. Reallocates the current year in the background.
    ///
    /// Must be called from within a tokio runtime.
    pub fn transaction_changed(&self, user_id: &str) -> RecomputeHandle {
        self.spawn(user_id, Utc::now().year())
    }

    /// Reallocate `year` of `user_id` in the background. The handle can be
    /// dropped; failures are logged either way.
    pub fn spawn(&self, user_id: &str, year: i32) -> RecomputeHandle {
        let engine = Arc::clone(&self.engine);
        let user_id = user_id.to_string();
        debug!(user_id = %user_id, year, "scheduling background reallocation");

        tokio::spawn(async move {
            let result = engine.reallocate(&user_id, year).await;
            if let Err(err) = &result {
                error!(user_id = %user_id, year, "background reallocation failed: {err}");
            }
            result
        })
    }
}
