//! API middleware.

use axum::{
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dispute_desk_common::AppError;
use dispute_desk_core::{DisputeService, StaffService, SyncService};

/// Application state.
#[derive(Clone)]
pub struct AppState {
    pub dispute_service: DisputeService,
    pub sync_service: SyncService,
    pub staff_service: StaffService,
}

/// Extract the credentials of a `Bearer` authorization value.
///
/// The scheme name is case-insensitive; an empty token yields `None`.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim_start().split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Authentication middleware.
///
/// Resolves `Authorization: Bearer <token>` to a staff user and stores it in
/// the request extensions. Requests without a valid token pass through
/// unauthenticated; handlers reject them via [`crate::extractors::AuthStaff`].
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(bearer_token)
        .map(str::to_owned);

    if let Some(token) = token {
        match state.staff_service.authenticate_by_token(&token).await {
            Ok(staff) => {
                tracing::debug!(staff_id = %staff.id, role = ?staff.role, "Authenticated staff user");
                req.extensions_mut().insert(staff);
            }
            Err(AppError::Unauthorized) => {}
            Err(e) => return e.into_response(),
        }
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token_scheme_is_case_insensitive() {
        assert_eq!(bearer_token("Bearer tok_1"), Some("tok_1"));
        assert_eq!(bearer_token("bearer tok_1"), Some("tok_1"));
        assert_eq!(bearer_token("BEARER  tok_1 "), Some("tok_1"));
    }

    #[test]
    fn test_bearer_token_rejects_other_values() {
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer   "), None);
        assert_eq!(bearer_token("Bearertok_1"), None);
    }
}
