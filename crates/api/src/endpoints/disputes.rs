//! Dispute endpoints.

use std::collections::BTreeMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use dispute_desk_common::{AppError, AppResult};
use dispute_desk_core::{
    DisputeResponse, DisputeStats, EvidenceSubmission, RebuttalResponse, SyncReport,
};
use dispute_desk_db::entities::staff_user::StaffRole;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{extractors::AuthStaff, middleware::AppState};

/// Roles allowed to trigger a sync or reassign disputes.
const SUPERVISOR_ROLES: &[StaffRole] = &[StaffRole::Admin, StaffRole::Manager];

// ==================== Request/Response Types ====================

/// List disputes query.
#[derive(Debug, Deserialize, Validate)]
pub struct ListQuery {
    #[validate(range(min = 1, max = 100))]
    pub limit: Option<u64>,
}

/// Assign dispute request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRequest {
    #[serde(default)]
    pub staff_user_id: Option<String>,
}

/// Submit evidence request.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EvidenceRequest {
    #[validate(length(min = 1, max = 5000))]
    pub content: String,
    #[serde(default)]
    pub evidence: BTreeMap<String, String>,
}

/// Sync response.
#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub message: &'static str,
    #[serde(flatten)]
    pub report: SyncReport,
}

// ==================== Handlers ====================

/// List disputes, newest first.
async fn list(
    AuthStaff(_staff): AuthStaff,
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<DisputeResponse>>> {
    query.validate()?;

    let disputes = state.dispute_service.list(query.limit).await?;
    Ok(Json(disputes))
}

/// Dashboard statistics.
async fn stats(
    AuthStaff(_staff): AuthStaff,
    State(state): State<AppState>,
) -> AppResult<Json<DisputeStats>> {
    Ok(Json(state.dispute_service.stats().await?))
}

/// Show a dispute.
async fn show(
    AuthStaff(_staff): AuthStaff,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<DisputeResponse>> {
    Ok(Json(state.dispute_service.get(&id).await?))
}

/// Pull disputes from every configured processor.
async fn sync(
    AuthStaff(staff): AuthStaff,
    State(state): State<AppState>,
) -> AppResult<Json<SyncResponse>> {
    if !staff.has_any_role(SUPERVISOR_ROLES) {
        return Err(AppError::Forbidden(
            "Only admins and managers can sync disputes".to_string(),
        ));
    }

    tracing::info!(staff_id = %staff.id, "Dispute sync requested");
    let report = state.sync_service.sync().await?;

    Ok(Json(SyncResponse {
        message: "Sync completed",
        report,
    }))
}

/// Assign or unassign a dispute.
async fn assign(
    AuthStaff(staff): AuthStaff,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<AssignRequest>,
) -> AppResult<Json<DisputeResponse>> {
    if !staff.has_any_role(SUPERVISOR_ROLES) {
        return Err(AppError::Forbidden(
            "Only admins and managers can assign disputes".to_string(),
        ));
    }

    let dispute = state.dispute_service.assign(&id, req.staff_user_id).await?;
    Ok(Json(dispute))
}

/// Submit evidence for a dispute.
async fn submit_evidence(
    AuthStaff(staff): AuthStaff,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<EvidenceRequest>,
) -> AppResult<Json<RebuttalResponse>> {
    req.validate()?;

    let evidence = EvidenceSubmission {
        content: req.content,
        fields: req.evidence,
    };
    let rebuttal = state
        .dispute_service
        .submit_evidence(&id, &staff, evidence)
        .await?;

    Ok(Json(rebuttal))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list))
        .route("/stats", get(stats))
        .route("/sync", post(sync))
        .route("/{id}", get(show))
        .route("/{id}/assign", post(assign))
        .route("/{id}/evidence", post(submit_evidence))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_limit_bounds() {
        assert!(ListQuery { limit: None }.validate().is_ok());
        assert!(ListQuery { limit: Some(1) }.validate().is_ok());
        assert!(ListQuery { limit: Some(100) }.validate().is_ok());
        assert!(ListQuery { limit: Some(0) }.validate().is_err());
        assert!(ListQuery { limit: Some(101) }.validate().is_err());
    }

    #[test]
    fn test_evidence_request_content_length() {
        let req = |content: String| EvidenceRequest {
            content,
            evidence: BTreeMap::new(),
        };

        assert!(req("Tracking attached".to_string()).validate().is_ok());
        assert!(req(String::new()).validate().is_err());
        assert!(req("x".repeat(5000)).validate().is_ok());
        assert!(req("x".repeat(5001)).validate().is_err());
    }

    #[test]
    fn test_assign_request_accepts_null() {
        let req: AssignRequest = serde_json::from_str(r#"{"staffUserId":null}"#).unwrap();
        assert_eq!(req.staff_user_id, None);

        let req: AssignRequest = serde_json::from_str(r#"{"staffUserId":"s1"}"#).unwrap();
        assert_eq!(req.staff_user_id.as_deref(), Some("s1"));
    }

    #[test]
    fn test_sync_response_shape() {
        let json = serde_json::to_value(SyncResponse {
            message: "Sync completed",
            report: SyncReport {
                stripe_count: 3,
                paypal_count: 1,
            },
        })
        .unwrap();

        assert_eq!(
            json,
            serde_json::json!({ "message": "Sync completed", "stripeCount": 3, "paypalCount": 1 })
        );
    }
}
