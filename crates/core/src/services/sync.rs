//! Processor sync service.

use chrono::Utc;
use dispute_desk_common::{AppResult, IdGenerator};
use dispute_desk_db::{
    entities::dispute::{self, Processor},
    repositories::DisputeRepository,
};
use sea_orm::Set;
use serde::Serialize;
use tracing::{info, warn};

use crate::processors::{NormalizedDispute, ProcessorRegistry};

/// Processors in the order they are synced.
const SYNC_ORDER: [Processor; 2] = [Processor::Stripe, Processor::PayPal];

/// Number of disputes pulled from each processor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub stripe_count: usize,
    pub paypal_count: usize,
}

/// Pulls disputes from every configured processor into the database.
#[derive(Clone)]
pub struct SyncService {
    dispute_repo: DisputeRepository,
    processors: ProcessorRegistry,
    id_gen: IdGenerator,
}

impl SyncService {
    /// Create a new sync service.
    #[must_use]
    pub const fn new(dispute_repo: DisputeRepository, processors: ProcessorRegistry) -> Self {
        Self {
            dispute_repo,
            processors,
            id_gen: IdGenerator::new(),
        }
    }

    /// Sync Stripe, then `PayPal`.
    ///
    /// The first failure aborts the run; rows already upserted stay.
    pub async fn sync(&self) -> AppResult<SyncReport> {
        let mut report = SyncReport::default();

        for processor in SYNC_ORDER {
            let count = self.sync_processor(processor).await?;
            match processor {
                Processor::Stripe => report.stripe_count = count,
                Processor::PayPal => report.paypal_count = count,
            }
        }

        info!(
            stripe = report.stripe_count,
            paypal = report.paypal_count,
            "Dispute sync completed"
        );
        Ok(report)
    }

    async fn sync_processor(&self, processor: Processor) -> AppResult<usize> {
        let Some(adapter) = self.processors.get(processor) else {
            info!(%processor, "Processor not configured, skipping sync");
            return Ok(0);
        };

        let disputes = adapter.fetch_disputes().await.inspect_err(|e| {
            warn!(%processor, error = %e, "Dispute sync aborted");
        })?;
        let count = disputes.len();

        for dispute in disputes {
            self.dispute_repo
                .upsert_by_external_id(self.to_active_model(dispute))
                .await?;
        }

        info!(%processor, count, "Synced disputes");
        Ok(count)
    }

    fn to_active_model(&self, d: NormalizedDispute) -> dispute::ActiveModel {
        let now = Utc::now().fixed_offset();
        dispute::ActiveModel {
            id: Set(self.id_gen.generate()),
            external_id: Set(d.external_id),
            processor: Set(d.processor),
            amount: Set(d.amount),
            currency: Set(d.currency),
            reason: Set(d.reason),
            status: Set(d.status),
            customer_email: Set(d.customer_email),
            transaction_date: Set(d.transaction_date.fixed_offset()),
            assigned_to_id: Set(None),
            created_at: Set(now),
            updated_at: Set(Some(now)),
        }
    }
}
