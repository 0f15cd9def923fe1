//! Rebuttal entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Evidence submitted by staff in response to a dispute.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "rebuttal")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub dispute_id: String,

    /// Staff user who submitted the evidence.
    #[sea_orm(nullable)]
    pub author_id: Option<String>,

    /// Free-form rebuttal text.
    #[sea_orm(column_type = "Text")]
    pub content: String,

    /// Evidence fields forwarded to the processor (JSON object of strings).
    #[sea_orm(column_type = "JsonBinary")]
    pub evidence: Json,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::dispute::Entity",
        from = "Column::DisputeId",
        to = "super::dispute::Column::Id",
        on_delete = "Cascade"
    )]
    Dispute,

    #[sea_orm(
        belongs_to = "super::staff_user::Entity",
        from = "Column::AuthorId",
        to = "super::staff_user::Column::Id",
        on_delete = "SetNull"
    )]
    Author,
}

impl Related<super::dispute::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Dispute.def()
    }
}

impl Related<super::staff_user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Author.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
