//! Processor status vocabularies mapped onto [`DisputeStatus`].
//!
//! Unknown values fall back to [`DisputeStatus::Open`].

use dispute_desk_db::entities::dispute::DisputeStatus;

const STRIPE_STATUSES: &[(&str, DisputeStatus)] = &[
    ("needs_response", DisputeStatus::Open),
    ("under_review", DisputeStatus::InProgress),
    ("won", DisputeStatus::Resolved),
    ("lost", DisputeStatus::Closed),
];

const PAYPAL_STATUSES: &[(&str, DisputeStatus)] = &[
    ("OPEN", DisputeStatus::Open),
    ("WAITING_FOR_SELLER_RESPONSE", DisputeStatus::Open),
    ("WAITING_FOR_BUYER_RESPONSE", DisputeStatus::InProgress),
    ("UNDER_REVIEW", DisputeStatus::InProgress),
    ("RESOLVED", DisputeStatus::Resolved),
];

fn lookup(table: &[(&str, DisputeStatus)], status: &str) -> DisputeStatus {
    table
        .iter()
        .find(|(key, _)| *key == status)
        .map_or(DisputeStatus::Open, |(_, mapped)| *mapped)
}

/// Map a Stripe dispute status.
#[must_use]
pub fn map_stripe_status(status: &str) -> DisputeStatus {
    lookup(STRIPE_STATUSES, status)
}

/// Map a `PayPal` dispute status.
#[must_use]
pub fn map_paypal_status(status: &str) -> DisputeStatus {
    lookup(PAYPAL_STATUSES, status)
}
