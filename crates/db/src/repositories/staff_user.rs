//! Staff user repository.

use std::sync::Arc;

use crate::entities::{StaffUser, staff_user};
use dispute_desk_common::{AppError, AppResult};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

/// Staff user repository for database operations.
#[derive(Clone)]
pub struct StaffUserRepository {
    db: Arc<DatabaseConnection>,
}

impl StaffUserRepository {
    /// Create a new staff user repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a staff user by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<staff_user::Model>> {
        StaffUser::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a staff user by ID, returning an error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<staff_user::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::StaffUserNotFound(id.to_string()))
    }

    /// Find staff users by IDs.
    pub async fn find_by_ids(&self, ids: &[String]) -> AppResult<Vec<staff_user::Model>> {
        if ids.is_empty() {
            return Ok(vec![]);
        }

        StaffUser::find()
            .filter(staff_user::Column::Id.is_in(ids.to_vec()))
            .all(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }

    /// Find a staff user by API token.
    pub async fn find_by_token(&self, token: &str) -> AppResult<Option<staff_user::Model>> {
        StaffUser::find()
            .filter(staff_user::Column::Token.eq(token))
            .one(self.db.as_ref())
            .await
            .map_err(|e| AppError::Database(e.to_string()))
    }
}
