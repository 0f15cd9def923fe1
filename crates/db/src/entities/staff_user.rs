//! Staff user entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Staff role.
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
pub enum StaffRole {
    #[sea_orm(string_value = "ADMIN")]
    Admin,
    #[sea_orm(string_value = "MANAGER")]
    Manager,
    #[sea_orm(string_value = "AGENT")]
    #[default]
    Agent,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "staff_user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    #[sea_orm(unique)]
    pub email: String,

    pub role: StaffRole,

    /// API access token
    #[sea_orm(unique, nullable)]
    #[serde(skip_serializing)]
    pub token: Option<String>,

    pub created_at: DateTimeWithTimeZone,
}

impl Model {
    /// Whether this user holds one of `roles`.
    #[must_use]
    pub fn has_any_role(&self, roles: &[StaffRole]) -> bool {
        roles.contains(&self.role)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::dispute::Entity")]
    AssignedDisputes,
}

impl Related<super::dispute::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AssignedDisputes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
