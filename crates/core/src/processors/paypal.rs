//! `PayPal` customer disputes API client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dispute_desk_common::{AppError, AppResult, config::PayPalConfig};
use dispute_desk_db::entities::dispute::Processor;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error};

use super::money::{ensure_non_negative, parse_major_units};
use super::status::map_paypal_status;
use super::{DisputeProcessor, EvidenceSubmission, NormalizedDispute, endpoint, parse_base_url};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PAGE_SIZE: &str = "50";

#[derive(Debug, Deserialize)]
struct AccessToken {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct DisputeList {
    #[serde(default)]
    items: Vec<PayPalDispute>,
}

#[derive(Debug, Deserialize)]
struct PayPalDispute {
    dispute_id: String,
    #[serde(default)]
    reason: String,
    status: String,
    dispute_amount: Money,
    create_time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct Money {
    currency_code: String,
    value: String,
}

impl PayPalDispute {
    fn normalize(self) -> AppResult<NormalizedDispute> {
        let amount = parse_major_units(&self.dispute_amount.value)?;
        let amount = ensure_non_negative(amount, &self.dispute_id)?;

        Ok(NormalizedDispute {
            status: map_paypal_status(&self.status),
            external_id: self.dispute_id,
            processor: Processor::PayPal,
            amount,
            currency: self.dispute_amount.currency_code.to_uppercase(),
            reason: self.reason,
            customer_email: None,
            transaction_date: self.create_time,
        })
    }
}

/// Client for the `PayPal` REST API.
///
/// An OAuth access token is requested for every operation; nothing is cached.
#[derive(Clone)]
pub struct PayPalClient {
    http_client: reqwest::Client,
    client_id: String,
    client_secret: String,
    base_url: reqwest::Url,
}

impl PayPalClient {
    /// Create a client from configuration.
    pub fn new(config: &PayPalConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build PayPal client: {e}")))?;

        Ok(Self {
            http_client,
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            base_url: parse_base_url(config.api_base())?,
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> AppResult<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, "PayPal request failed");
            AppError::ExternalService(format!("PayPal request failed: {e}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, %body, "PayPal API error");
            return Err(AppError::ExternalService(format!(
                "PayPal API error: {status} - {body}"
            )));
        }

        Ok(response)
    }

    async fn access_token(&self) -> AppResult<String> {
        let request = self
            .http_client
            .post(endpoint(&self.base_url, &["v1", "oauth2", "token"])?)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .form(&[("grant_type", "client_credentials")]);

        let token: AccessToken = self.send(request).await?.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse PayPal token response");
            AppError::ExternalService(format!("Failed to parse PayPal token response: {e}"))
        })?;

        Ok(token.access_token)
    }
}

/// Render evidence as the notes text `PayPal` accepts.
fn evidence_notes(evidence: &EvidenceSubmission) -> String {
    let mut notes = evidence.content.clone();
    for (field, value) in &evidence.fields {
        if !notes.is_empty() {
            notes.push('\n');
        }
        notes.push_str(field);
        notes.push_str(": ");
        notes.push_str(value);
    }
    notes
}

#[async_trait]
impl DisputeProcessor for PayPalClient {
    fn processor(&self) -> Processor {
        Processor::PayPal
    }

    async fn fetch_disputes(&self) -> AppResult<Vec<NormalizedDispute>> {
        let token = self.access_token().await?;

        let request = self
            .http_client
            .get(endpoint(&self.base_url, &["v1", "customer", "disputes"])?)
            .bearer_auth(token)
            .query(&[("page_size", PAGE_SIZE)]);

        let list: DisputeList = self.send(request).await?.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse PayPal dispute list");
            AppError::ExternalService(format!("Failed to parse PayPal response: {e}"))
        })?;

        debug!(count = list.items.len(), "Fetched PayPal disputes");

        list.items
            .into_iter()
            .map(PayPalDispute::normalize)
            .collect::<AppResult<Vec<_>>>()
            .inspect_err(|e| error!(error = %e, "Failed to normalize PayPal dispute"))
    }

    async fn submit_evidence(
        &self,
        external_id: &str,
        evidence: &EvidenceSubmission,
    ) -> AppResult<()> {
        let token = self.access_token().await?;

        let input = json!({
            "evidences": [{
                "evidence_type": "OTHER",
                "notes": evidence_notes(evidence),
            }]
        });
        let part = Part::text(input.to_string())
            .mime_str("application/json")
            .map_err(|e| AppError::Internal(format!("Invalid multipart content type: {e}")))?;

        let request = self
            .http_client
            .post(endpoint(
                &self.base_url,
                &["v1", "customer", "disputes", external_id, "provide-evidence"],
            )?)
            .bearer_auth(token)
            .multipart(Form::new().part("input", part));
        self.send(request).await?;

        debug!(external_id, "Submitted PayPal evidence");
        Ok(())
    }
}
