//! Core business logic for dispute-desk.
//!
//! - [`processors`]: adapters that pull disputes from Stripe and `PayPal`
//!   and normalize them into the internal shape
//! - [`services`]: dispute queries, processor sync, staff authentication

pub mod processors;
pub mod services;

pub use processors::{
    DisputeProcessor, EvidenceSubmission, NormalizedDispute, PayPalClient, ProcessorRegistry,
    StripeClient,
};
pub use services::*;

