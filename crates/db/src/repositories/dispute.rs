//! Dispute repository.

use std::sync::Arc;

use crate::entities::{Dispute, dispute};
use dispute_desk_common::{AppError, AppResult};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, Set, sea_query::{Expr, OnConflict},
};

/// Per-status aggregate row.
#[derive(Debug, Clone, PartialEq, Eq, FromQueryResult)]
pub struct StatusSummary {
    pub status: dispute::DisputeStatus,
    pub count: i64,
    pub amount: Option<Decimal>,
}

/// Dispute repository for database operations.
#[derive(Clone)]
pub struct DisputeRepository {
    db: Arc<DatabaseConnection>,
}

impl DisputeRepository {
    /// Create a new dispute repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a dispute by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<dispute::Model>> {
        Dispute::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Get a dispute by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<dispute::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::DisputeNotFound(id.to_string()))
    }

    /// Find disputes newest first.
    ///
    /// Ties on `created_at` (bulk syncs) fall back to the time-ordered ID.
    pub async fn find_recent(&self, limit: Option<u64>) -> AppResult<Vec<dispute::Model>> {
        Dispute::find()
            .order_by_desc(dispute::Column::CreatedAt)
            .order_by_desc(dispute::Column::Id)
            .limit(limit)
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a dispute by the processor's own identifier.
    pub async fn find_by_external_id(
        &self,
        processor: dispute::Processor,
        external_id: &str,
    ) -> AppResult<Option<dispute::Model>> {
        Dispute::find()
            .filter(dispute::Column::Processor.eq(processor))
            .filter(dispute::Column::ExternalId.eq(external_id))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Count disputes and sum their amounts, grouped by status.
    pub async fn summarize_by_status(&self) -> AppResult<Vec<StatusSummary>> {
        Dispute::find()
            .select_only()
            .column(dispute::Column::Status)
            .column_as(Expr::col(dispute::Column::Id).count(), "count")
            .column_as(Expr::col(dispute::Column::Amount).sum(), "amount")
            .group_by(dispute::Column::Status)
            .into_model::<StatusSummary>()
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Create a new dispute.
    pub async fn create(&self, model: dispute::ActiveModel) -> AppResult<dispute::Model> {
        model
            .insert(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Insert a dispute, or refresh the processor-owned fields of the existing
    /// row with the same `(processor, external_id)`.
    ///
    /// Assignment and `created_at` of an existing row are left untouched.
    pub async fn upsert_by_external_id(&self, model: dispute::ActiveModel) -> AppResult<()> {
        Dispute::insert(model)
            .on_conflict(
                OnConflict::columns([dispute::Column::Processor, dispute::Column::ExternalId])
                    .update_columns([
                        dispute::Column::Amount,
                        dispute::Column::Currency,
                        dispute::Column::Reason,
                        dispute::Column::Status,
                        dispute::Column::CustomerEmail,
                        dispute::Column::TransactionDate,
                        dispute::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;
        Ok(())
    }

    /// Set or clear the assignee of a dispute.
    pub async fn set_assignee(
        &self,
        id: &str,
        staff_user_id: Option<String>,
    ) -> AppResult<dispute::Model> {
        let dispute = self.get_by_id(id).await?;
        let mut active: dispute::ActiveModel = dispute.into();

        active.assigned_to_id = Set(staff_user_id);
        active.updated_at = Set(Some(chrono::Utc::now().into()));

        active
            .update(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
