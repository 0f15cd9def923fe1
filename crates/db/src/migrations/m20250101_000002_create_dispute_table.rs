//! Create dispute table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Dispute::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Dispute::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Dispute::ExternalId).string_len(128).not_null())
                    .col(ColumnDef::new(Dispute::Processor).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Dispute::Amount)
                            .decimal_len(12, 2)
                            .not_null()
                            .check(Expr::col(Dispute::Amount).gte(0)),
                    )
                    .col(ColumnDef::new(Dispute::Currency).string_len(3).not_null())
                    .col(ColumnDef::new(Dispute::Reason).text().not_null())
                    .col(
                        ColumnDef::new(Dispute::Status)
                            .string_len(16)
                            .not_null()
                            .default("OPEN"),
                    )
                    .col(ColumnDef::new(Dispute::CustomerEmail).string_len(256).null())
                    .col(
                        ColumnDef::new(Dispute::TransactionDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Dispute::AssignedToId).string_len(32).null())
                    .col(
                        ColumnDef::new(Dispute::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Dispute::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_dispute_assigned_to")
                            .from(Dispute::Table, Dispute::AssignedToId)
                            .to(StaffUser::Table, StaffUser::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // Sync upserts on the processor's own identifier
        manager
            .create_index(
                Index::create()
                    .name("idx_dispute_processor_external_id")
                    .table(Dispute::Table)
                    .col(Dispute::Processor)
                    .col(Dispute::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dispute_created_at")
                    .table(Dispute::Table)
                    .col(Dispute::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_dispute_status")
                    .table(Dispute::Table)
                    .col(Dispute::Status)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Dispute::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Dispute {
    Table,
    Id,
    ExternalId,
    Processor,
    Amount,
    Currency,
    Reason,
    Status,
    CustomerEmail,
    TransactionDate,
    AssignedToId,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
pub enum StaffUser {
    Table,
    Id,
}
