//! Dispute service.

use std::collections::HashMap;

use chrono::Utc;
use dispute_desk_common::{AppError, AppResult, IdGenerator};
use dispute_desk_db::{
    entities::{
        dispute::{self, DisputeStatus, Processor},
        rebuttal,
        staff_user::{self, StaffRole},
    },
    repositories::{DisputeRepository, RebuttalRepository, StaffUserRepository},
};
use rust_decimal::Decimal;
use sea_orm::Set;
use serde::Serialize;
use tracing::info;

use crate::processors::{EvidenceSubmission, ProcessorRegistry};

/// Public view of a staff user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffUserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: StaffRole,
}

impl From<staff_user::Model> for StaffUserSummary {
    fn from(user: staff_user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Evidence recorded against a dispute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RebuttalResponse {
    pub id: String,
    pub dispute_id: String,
    pub author_id: Option<String>,
    pub content: String,
    pub evidence: serde_json::Value,
    pub created_at: String,
}

impl From<rebuttal::Model> for RebuttalResponse {
    fn from(r: rebuttal::Model) -> Self {
        Self {
            id: r.id,
            dispute_id: r.dispute_id,
            author_id: r.author_id,
            content: r.content,
            evidence: r.evidence,
            created_at: r.created_at.to_rfc3339(),
        }
    }
}

/// Dispute with its assignee and rebuttals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeResponse {
    pub id: String,
    pub external_id: String,
    pub processor: Processor,
    pub amount: Decimal,
    pub currency: String,
    pub reason: String,
    pub status: DisputeStatus,
    pub status_label: &'static str,
    pub customer_email: Option<String>,
    pub transaction_date: String,
    pub assigned_to: Option<StaffUserSummary>,
    pub rebuttals: Vec<RebuttalResponse>,
    pub created_at: String,
    pub updated_at: Option<String>,
}

impl DisputeResponse {
    fn build(
        d: dispute::Model,
        assigned_to: Option<StaffUserSummary>,
        rebuttals: Vec<RebuttalResponse>,
    ) -> Self {
        Self {
            id: d.id,
            external_id: d.external_id,
            processor: d.processor,
            amount: d.amount,
            currency: d.currency,
            reason: d.reason,
            status: d.status,
            status_label: d.status.label(),
            customer_email: d.customer_email,
            transaction_date: d.transaction_date.to_rfc3339(),
            assigned_to,
            rebuttals,
            created_at: d.created_at.to_rfc3339(),
            updated_at: d.updated_at.map(|t| t.to_rfc3339()),
        }
    }
}

/// Dashboard summary counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeStats {
    pub total: i64,
    pub open: i64,
    pub in_progress: i64,
    pub resolved: i64,
    pub closed: i64,
    /// Sum of all dispute amounts, mixed currencies included.
    pub total_amount: Decimal,
}

/// Dispute service for business logic.
#[derive(Clone)]
pub struct DisputeService {
    dispute_repo: DisputeRepository,
    rebuttal_repo: RebuttalRepository,
    staff_user_repo: StaffUserRepository,
    processors: ProcessorRegistry,
    id_gen: IdGenerator,
}

impl DisputeService {
    /// Create a new dispute service.
    #[must_use]
    pub const fn new(
        dispute_repo: DisputeRepository,
        rebuttal_repo: RebuttalRepository,
        staff_user_repo: StaffUserRepository,
        processors: ProcessorRegistry,
    ) -> Self {
        Self {
            dispute_repo,
            rebuttal_repo,
            staff_user_repo,
            processors,
            id_gen: IdGenerator::new(),
        }
    }

    /// List disputes, newest first.
    pub async fn list(&self, limit: Option<u64>) -> AppResult<Vec<DisputeResponse>> {
        let disputes = self.dispute_repo.find_recent(limit).await?;
        self.hydrate(disputes).await
    }

    /// Get a single dispute.
    pub async fn get(&self, id: &str) -> AppResult<DisputeResponse> {
        let dispute = self.dispute_repo.get_by_id(id).await?;
        self.hydrate_one(dispute).await
    }

    /// Per-status counts and the total disputed amount.
    pub async fn stats(&self) -> AppResult<DisputeStats> {
        let rows = self.dispute_repo.summarize_by_status().await?;

        let mut stats = DisputeStats::default();
        for row in rows {
            stats.total += row.count;
            stats.total_amount += row.amount.unwrap_or_default();
            match row.status {
                DisputeStatus::Open => stats.open += row.count,
                DisputeStatus::InProgress => stats.in_progress += row.count,
                DisputeStatus::Resolved => stats.resolved += row.count,
                DisputeStatus::Closed => stats.closed += row.count,
            }
        }
        Ok(stats)
    }

    /// Assign a dispute to a staff user, or clear the assignment with `None`.
    pub async fn assign(
        &self,
        id: &str,
        staff_user_id: Option<String>,
    ) -> AppResult<DisputeResponse> {
        if let Some(staff_id) = &staff_user_id {
            self.staff_user_repo.get_by_id(staff_id).await?;
        }

        let dispute = self.dispute_repo.set_assignee(id, staff_user_id).await?;
        info!(
            dispute_id = %dispute.id,
            assigned_to = ?dispute.assigned_to_id,
            "Dispute assignment changed"
        );

        self.hydrate_one(dispute).await
    }

    /// Forward evidence to the dispute's processor and record it as a rebuttal.
    ///
    /// Nothing is recorded when the processor rejects the submission.
    pub async fn submit_evidence(
        &self,
        id: &str,
        author: &staff_user::Model,
        evidence: EvidenceSubmission,
    ) -> AppResult<RebuttalResponse> {
        let dispute = self.dispute_repo.get_by_id(id).await?;

        let adapter = self.processors.get(dispute.processor).ok_or_else(|| {
            AppError::Config(format!("{} is not configured", dispute.processor))
        })?;
        adapter
            .submit_evidence(&dispute.external_id, &evidence)
            .await?;

        let fields = serde_json::to_value(&evidence.fields)
            .map_err(|e| AppError::Internal(format!("Failed to encode evidence: {e}")))?;

        let model = rebuttal::ActiveModel {
            id: Set(self.id_gen.generate()),
            dispute_id: Set(dispute.id.clone()),
            author_id: Set(Some(author.id.clone())),
            content: Set(evidence.content),
            evidence: Set(fields),
            created_at: Set(Utc::now().fixed_offset()),
        };
        let rebuttal = self.rebuttal_repo.create(model).await?;

        info!(
            dispute_id = %dispute.id,
            processor = %dispute.processor,
            author_id = %author.id,
            "Evidence submitted"
        );

        Ok(rebuttal.into())
    }

    async fn hydrate_one(&self, dispute: dispute::Model) -> AppResult<DisputeResponse> {
        self.hydrate(vec![dispute])
            .await?
            .pop()
            .ok_or_else(|| AppError::Internal("Dispute vanished while loading".to_string()))
    }

    /// Attach assignees and rebuttals with one query each.
    async fn hydrate(&self, disputes: Vec<dispute::Model>) -> AppResult<Vec<DisputeResponse>> {
        let mut staff_ids: Vec<String> = disputes
            .iter()
            .filter_map(|d| d.assigned_to_id.clone())
            .collect();
        staff_ids.sort_unstable();
        staff_ids.dedup();
        let dispute_ids: Vec<String> = disputes.iter().map(|d| d.id.clone()).collect();

        let staff: HashMap<String, StaffUserSummary> = self
            .staff_user_repo
            .find_by_ids(&staff_ids)
            .await?
            .into_iter()
            .map(|u| (u.id.clone(), u.into()))
            .collect();

        let mut rebuttals: HashMap<String, Vec<RebuttalResponse>> = HashMap::new();
        for r in self.rebuttal_repo.find_by_dispute_ids(&dispute_ids).await? {
            rebuttals
                .entry(r.dispute_id.clone())
                .or_default()
                .push(r.into());
        }

        Ok(disputes
            .into_iter()
            .map(|d| {
                let assigned_to = d
                    .assigned_to_id
                    .as_ref()
                    .and_then(|sid| staff.get(sid).cloned());
                let rebuttals = rebuttals.remove(&d.id).unwrap_or_default();
                DisputeResponse::build(d, assigned_to, rebuttals)
            })
            .collect())
    }
}
