//! Request extractors.

use axum::{extract::FromRequestParts, http::request::Parts};
use dispute_desk_common::AppError;
use dispute_desk_db::entities::staff_user;

/// Authenticated staff user extractor.
#[derive(Debug, Clone)]
pub struct AuthStaff(pub staff_user::Model);

impl<S> FromRequestParts<S> for AuthStaff
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by auth middleware
        parts
            .extensions
            .get::<staff_user::Model>()
            .cloned()
            .map(AuthStaff)
            .ok_or(AppError::Unauthorized)
    }
}
