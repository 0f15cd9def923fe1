//! Rebuttal repository.

use std::sync::Arc;

use crate::entities::{Rebuttal, rebuttal};
use dispute_desk_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

/// Rebuttal repository for database operations.
#[derive(Clone)]
pub struct RebuttalRepository {
    db: Arc<DatabaseConnection>,
}

impl RebuttalRepository {
    /// Create a new rebuttal repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find rebuttals for many disputes at once, oldest first.
    pub async fn find_by_dispute_ids(
        &self,
        dispute_ids: &[String],
    ) -> AppResult<Vec<rebuttal::Model>> {
        if dispute_ids.is_empty() {
            return Ok(vec![]);
        }

        Rebuttal::find()
            .filter(rebuttal::Column::DisputeId.is_in(dispute_ids.to_vec()))
            .order_by_asc(rebuttal::Column::CreatedAt)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new rebuttal.
    pub async fn create(&self, model: rebuttal::ActiveModel) -> AppResult<rebuttal::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
