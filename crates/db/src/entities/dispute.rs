//! Dispute entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Payment processor that originated a dispute.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum Processor {
    #[sea_orm(string_value = "STRIPE")]
    #[serde(rename = "STRIPE")]
    Stripe,
    #[sea_orm(string_value = "PAYPAL")]
    #[serde(rename = "PAYPAL")]
    PayPal,
}

impl Processor {
    /// Wire name of the processor.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stripe => "STRIPE",
            Self::PayPal => "PAYPAL",
        }
    }
}

impl std::fmt::Display for Processor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized dispute status.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumIter,
    DeriveActiveEnum,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DisputeStatus {
    #[sea_orm(string_value = "OPEN")]
    #[default]
    Open,
    #[sea_orm(string_value = "IN_PROGRESS")]
    InProgress,
    #[sea_orm(string_value = "RESOLVED")]
    Resolved,
    #[sea_orm(string_value = "CLOSED")]
    Closed,
}

impl DisputeStatus {
    /// Human-readable label shown on the dashboard.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::InProgress => "In Progress",
            Self::Resolved => "Resolved",
            Self::Closed => "Closed",
        }
    }
}

impl std::fmt::Display for DisputeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Dispute model.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "dispute")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Identifier assigned by the processor (`dp_...`, `PP-D-...`).
    pub external_id: String,

    pub processor: Processor,

    /// Disputed amount in major currency units. Never negative.
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,

    /// Upper-case ISO 4217 code.
    pub currency: String,

    #[sea_orm(column_type = "Text")]
    pub reason: String,

    pub status: DisputeStatus,

    #[sea_orm(nullable)]
    pub customer_email: Option<String>,

    /// When the disputed charge happened.
    pub transaction_date: DateTimeWithTimeZone,

    /// Staff user triaging this dispute.
    #[sea_orm(nullable)]
    pub assigned_to_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::staff_user::Entity",
        from = "Column::AssignedToId",
        to = "super::staff_user::Column::Id",
        on_delete = "SetNull"
    )]
    AssignedTo,

    #[sea_orm(has_many = "super::rebuttal::Entity")]
    Rebuttals,
}

impl Related<super::staff_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignedTo.def()
    }
}

impl Related<super::rebuttal::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Rebuttals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
