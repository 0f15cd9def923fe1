//! Payment processor adapters.
//!
//! Each processor exposes the same two operations behind
//! [`DisputeProcessor`]: pull the current dispute list, and push evidence
//! for one dispute. Responses are normalized into [`NormalizedDispute`] so
//! the sync service never sees processor-specific payloads.

pub mod money;
pub mod paypal;
pub mod status;
pub mod stripe;

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dispute_desk_common::{AppError, AppResult, config::ProcessorsConfig};
use dispute_desk_db::entities::dispute::{DisputeStatus, Processor};
use reqwest::Url;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub use paypal::PayPalClient;
pub use stripe::StripeClient;

/// A dispute as reported by a processor, in the internal shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedDispute {
    pub external_id: String,
    pub processor: Processor,
    /// Major currency units.
    pub amount: Decimal,
    pub currency: String,
    pub reason: String,
    pub status: DisputeStatus,
    pub customer_email: Option<String>,
    pub transaction_date: DateTime<Utc>,
}

/// Evidence staff want to send to a processor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceSubmission {
    /// Free-form rebuttal text.
    pub content: String,
    /// Processor evidence fields, e.g. `shipping_tracking_number`.
    pub fields: BTreeMap<String, String>,
}

/// A payment processor that can report disputes and accept evidence.
#[async_trait]
pub trait DisputeProcessor: Send + Sync {
    /// Which processor this adapter talks to.
    fn processor(&self) -> Processor;

    /// Fetch the processor's current disputes.
    async fn fetch_disputes(&self) -> AppResult<Vec<NormalizedDispute>>;

    /// Submit evidence for the dispute with the given processor ID.
    async fn submit_evidence(
        &self,
        external_id: &str,
        evidence: &EvidenceSubmission,
    ) -> AppResult<()>;
}

/// Parse a configured API base URL.
fn parse_base_url(value: &str) -> AppResult<Url> {
    let url = Url::parse(value)
        .map_err(|e| AppError::Config(format!("Invalid API base URL {value:?}: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(AppError::Config(format!(
            "API base URL {value:?} cannot carry a path"
        )));
    }
    Ok(url)
}

/// Append `segments` to `base`, percent-encoding each one.
///
/// Processor IDs go through here so `/`, `?` or `#` inside an ID stay part
/// of a single path segment.
fn endpoint(base: &Url, segments: &[&str]) -> AppResult<Url> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|()| AppError::Config(format!("API base URL {base} cannot carry a path")))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

/// The configured processor adapters, in sync order.
#[derive(Clone, Default)]
pub struct ProcessorRegistry {
    adapters: Vec<Arc<dyn DisputeProcessor>>,
}

impl ProcessorRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build adapters for every processor with a configuration section.
    pub fn from_config(config: &ProcessorsConfig) -> AppResult<Self> {
        let mut registry = Self::new();
        if let Some(stripe) = &config.stripe {
            registry = registry.with(Arc::new(StripeClient::new(stripe)?));
        }
        if let Some(paypal) = &config.paypal {
            registry = registry.with(Arc::new(PayPalClient::new(paypal)?));
        }
        Ok(registry)
    }

    /// Register an adapter, replacing any existing one for the same processor.
    #[must_use]
    pub fn with(mut self, adapter: Arc<dyn DisputeProcessor>) -> Self {
        let processor = adapter.processor();
        self.adapters.retain(|a| a.processor() != processor);
        self.adapters.push(adapter);
        self
    }

    /// Adapter for `processor`, if configured.
    #[must_use]
    pub fn get(&self, processor: Processor) -> Option<&Arc<dyn DisputeProcessor>> {
        self.adapters.iter().find(|a| a.processor() == processor)
    }
}
