//! Staff authentication.

use dispute_desk_common::{AppError, AppResult};
use dispute_desk_db::{entities::staff_user, repositories::StaffUserRepository};

/// Resolves API tokens to staff users.
#[derive(Clone)]
pub struct StaffService {
    staff_user_repo: StaffUserRepository,
}

impl StaffService {
    /// Create a new staff service.
    #[must_use]
    pub const fn new(staff_user_repo: StaffUserRepository) -> Self {
        Self { staff_user_repo }
    }

    /// Authenticate a staff user by API token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<staff_user::Model> {
        if token.is_empty() {
            return Err(AppError::Unauthorized);
        }

        self.staff_user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::Utc;
    use dispute_desk_db::entities::staff_user::StaffRole;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_authenticate_valid_token() {
        let staff = staff_user::Model {
            id: "s1".to_string(),
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            role: StaffRole::Manager,
            token: Some("secret".to_string()),
            created_at: Utc::now().fixed_offset(),
        };
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[staff]])
            .into_connection();

        let service = StaffService::new(StaffUserRepository::new(Arc::new(db)));
        let user = service.authenticate_by_token("secret").await.unwrap();

        assert_eq!(user.id, "s1");
        assert_eq!(user.role, StaffRole::Manager);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_token() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<staff_user::Model>::new()])
            .into_connection();

        let service = StaffService::new(StaffUserRepository::new(Arc::new(db)));
        let result = service.authenticate_by_token("nope").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_authenticate_empty_token_skips_lookup() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();

        let service = StaffService::new(StaffUserRepository::new(Arc::new(db)));
        let result = service.authenticate_by_token("").await;

        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
