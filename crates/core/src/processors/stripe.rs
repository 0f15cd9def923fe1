//! Stripe disputes API client.

use std::time::Duration;

use async_trait::async_trait;
use chrono::DateTime;
use dispute_desk_common::{AppError, AppResult, config::StripeConfig};
use dispute_desk_db::entities::dispute::Processor;
use serde::Deserialize;
use tracing::{debug, error};

use super::money::{ensure_non_negative, minor_units_to_major};
use super::status::map_stripe_status;
use super::{DisputeProcessor, EvidenceSubmission, NormalizedDispute, endpoint, parse_base_url};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Evidence field that receives the free-form rebuttal text when the
/// caller did not set it explicitly.
const TEXT_FIELD: &str = "uncategorized_text";

#[derive(Debug, Deserialize)]
struct DisputeList {
    data: Vec<StripeDispute>,
}

#[derive(Debug, Deserialize)]
struct StripeDispute {
    id: String,
    amount: i64,
    currency: String,
    reason: String,
    status: String,
    created: i64,
    #[serde(default)]
    evidence: Option<StripeEvidence>,
}

#[derive(Debug, Default, Deserialize)]
struct StripeEvidence {
    #[serde(default)]
    customer_email_address: Option<String>,
}

impl StripeDispute {
    fn normalize(self) -> AppResult<NormalizedDispute> {
        let amount = ensure_non_negative(minor_units_to_major(self.amount), &self.id)?;
        let transaction_date = DateTime::from_timestamp(self.created, 0).ok_or_else(|| {
            AppError::ExternalService(format!(
                "Dispute {} has an invalid created timestamp: {}",
                self.id, self.created
            ))
        })?;

        Ok(NormalizedDispute {
            status: map_stripe_status(&self.status),
            customer_email: self
                .evidence
                .and_then(|e| e.customer_email_address)
                .filter(|email| !email.is_empty()),
            external_id: self.id,
            processor: Processor::Stripe,
            amount,
            currency: self.currency.to_uppercase(),
            reason: self.reason,
            transaction_date,
        })
    }
}

/// Client for the Stripe REST API.
#[derive(Clone)]
pub struct StripeClient {
    http_client: reqwest::Client,
    secret_key: String,
    api_version: String,
    base_url: reqwest::Url,
}

impl StripeClient {
    /// Create a client from configuration.
    pub fn new(config: &StripeConfig) -> AppResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build Stripe client: {e}")))?;

        Ok(Self {
            http_client,
            secret_key: config.secret_key.clone(),
            api_version: config.api_version.clone(),
            base_url: parse_base_url(&config.base_url)?,
        })
    }

    fn request(
        &self,
        method: reqwest::Method,
        segments: &[&str],
    ) -> AppResult<reqwest::RequestBuilder> {
        Ok(self
            .http_client
            .request(method, endpoint(&self.base_url, segments)?)
            .bearer_auth(&self.secret_key)
            .header("Stripe-Version", &self.api_version))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> AppResult<reqwest::Response> {
        let response = request.send().await.map_err(|e| {
            error!(error = %e, "Stripe request failed");
            AppError::ExternalService(format!("Stripe request failed: {e}"))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(%status, %body, "Stripe API error");
            return Err(AppError::ExternalService(format!(
                "Stripe API error: {status} - {body}"
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl DisputeProcessor for StripeClient {
    fn processor(&self) -> Processor {
        Processor::Stripe
    }

    async fn fetch_disputes(&self) -> AppResult<Vec<NormalizedDispute>> {
        let request = self.request(reqwest::Method::GET, &["v1", "disputes"])?.query(&[
            ("limit", "100"),
            ("expand[]", "data.payment_intent"),
            ("expand[]", "data.charge"),
        ]);

        let list: DisputeList = self.send(request).await?.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse Stripe dispute list");
            AppError::ExternalService(format!("Failed to parse Stripe response: {e}"))
        })?;

        debug!(count = list.data.len(), "Fetched Stripe disputes");

        list.data
            .into_iter()
            .map(StripeDispute::normalize)
            .collect::<AppResult<Vec<_>>>()
            .inspect_err(|e| error!(error = %e, "Failed to normalize Stripe dispute"))
    }

    async fn submit_evidence(
        &self,
        external_id: &str,
        evidence: &EvidenceSubmission,
    ) -> AppResult<()> {
        let mut form: Vec<(String, String)> = evidence
            .fields
            .iter()
            .map(|(field, value)| (format!("evidence[{field}]"), value.clone()))
            .collect();
        if !evidence.fields.contains_key(TEXT_FIELD) {
            form.push((format!("evidence[{TEXT_FIELD}]"), evidence.content.clone()));
        }

        let request = self
            .request(reqwest::Method::POST, &["v1", "disputes", external_id])?
            .form(&form);
        self.send(request).await?;

        debug!(external_id, fields = form.len(), "Submitted Stripe evidence");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use dispute_desk_db::entities::dispute::DisputeStatus;
    use rust_decimal::Decimal;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> StripeClient {
        StripeClient::new(&StripeConfig {
            secret_key: "sk_test_123".to_string(),
            api_version: "2023-10-16".to_string(),
            base_url: server.uri(),
        })
        .unwrap()
    }

    fn dispute_json(id: &str, amount: i64, status: &str) -> serde_json::Value {
        json!({
            "id": id,
            "object": "dispute",
            "amount": amount,
            "currency": "usd",
            "reason": "fraudulent",
            "status": status,
            "created": 1_700_000_000,
            "evidence": { "customer_email_address": "buyer@example.com" },
            "charge": { "id": "ch_1", "object": "charge" },
            "payment_intent": { "id": "pi_1", "object": "payment_intent" }
        })
    }

    #[tokio::test]
    async fn test_fetch_disputes_normalizes_payload() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/disputes"))
            .and(query_param("limit", "100"))
            .and(header("authorization", "Bearer sk_test_123"))
            .and(header("stripe-version", "2023-10-16"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "has_more": false,
                "data": [
                    dispute_json("dp_1", 1999, "needs_response"),
                    dispute_json("dp_2", 500, "lost"),
                ]
            })))
            .mount(&server)
            .await;

        let disputes = client_for(&server).fetch_disputes().await.unwrap();

        assert_eq!(disputes.len(), 2);
        let first = &disputes[0];
        assert_eq!(first.external_id, "dp_1");
        assert_eq!(first.processor, Processor::Stripe);
        assert_eq!(first.amount, Decimal::new(1999, 2));
        assert_eq!(first.currency, "USD");
        assert_eq!(first.reason, "fraudulent");
        assert_eq!(first.status, DisputeStatus::Open);
        assert_eq!(first.customer_email.as_deref(), Some("buyer@example.com"));
        assert_eq!(first.transaction_date.timestamp(), 1_700_000_000);
        assert_eq!(disputes[1].status, DisputeStatus::Closed);
    }

    #[tokio::test]
    async fn test_fetch_disputes_without_evidence_email() {
        let server = MockServer::start().await;
        let mut dispute = dispute_json("dp_1", 100, "won");
        dispute["evidence"] = json!({ "customer_email_address": null });

        Mock::given(method("GET"))
            .and(path("/v1/disputes"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [dispute] })))
            .mount(&server)
            .await;

        let disputes = client_for(&server).fetch_disputes().await.unwrap();
        assert_eq!(disputes[0].customer_email, None);
        assert_eq!(disputes[0].status, DisputeStatus::Resolved);
    }

    #[tokio::test]
    async fn test_fetch_disputes_api_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/disputes"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "error": { "type": "invalid_request_error", "message": "Invalid API Key" }
            })))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_disputes().await;
        match result {
            Err(AppError::ExternalService(msg)) => assert!(msg.contains("401")),
            other => panic!("Expected ExternalService, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_disputes_rejects_negative_amount() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/disputes"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "data": [dispute_json("dp_1", -100, "won")] })),
            )
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_disputes().await;
        assert!(matches!(result, Err(AppError::ExternalService(_))));
    }

    #[tokio::test]
    async fn test_fetch_disputes_malformed_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/disputes"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let result = client_for(&server).fetch_disputes().await;
        assert!(matches!(result, Err(AppError::ExternalService(_))));
    }

    #[tokio::test]
    async fn test_submit_evidence_posts_form_fields() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/disputes/dp_1"))
            .and(header("authorization", "Bearer sk_test_123"))
            .and(body_string_contains("evidence%5Bshipping_tracking_number%5D=1Z999"))
            .and(body_string_contains("evidence%5Buncategorized_text%5D=Delivered"))
            .respond_with(ResponseTemplate::new(200).set_body_json(dispute_json(
                "dp_1",
                1999,
                "under_review",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let evidence = EvidenceSubmission {
            content: "Delivered".to_string(),
            fields: [(
                "shipping_tracking_number".to_string(),
                "1Z999".to_string(),
            )]
            .into_iter()
            .collect(),
        };

        client_for(&server)
            .submit_evidence("dp_1", &evidence)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_submit_evidence_rejected() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/disputes/dp_1"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "message": "This dispute is already closed" }
            })))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .submit_evidence("dp_1", &EvidenceSubmission::default())
            .await;
        assert!(matches!(result, Err(AppError::ExternalService(_))));
    }

    #[tokio::test]
    async fn test_submit_evidence_encodes_dispute_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/disputes/dp%2F1%20x"))
            .respond_with(ResponseTemplate::new(200).set_body_json(dispute_json(
                "dp/1 x",
                1999,
                "under_review",
            )))
            .expect(1)
            .mount(&server)
            .await;

        client_for(&server)
            .submit_evidence("dp/1 x", &EvidenceSubmission::default())
            .await
            .unwrap();
    }
}
