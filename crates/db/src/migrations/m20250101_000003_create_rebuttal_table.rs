//! Create rebuttal table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Rebuttal::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Rebuttal::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Rebuttal::DisputeId).string_len(32).not_null())
                    .col(ColumnDef::new(Rebuttal::AuthorId).string_len(32).null())
                    .col(ColumnDef::new(Rebuttal::Content).text().not_null())
                    .col(ColumnDef::new(Rebuttal::Evidence).json_binary().not_null())
                    .col(
                        ColumnDef::new(Rebuttal::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rebuttal_dispute")
                            .from(Rebuttal::Table, Rebuttal::DisputeId)
                            .to(Dispute::Table, Dispute::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rebuttal_author")
                            .from(Rebuttal::Table, Rebuttal::AuthorId)
                            .to(StaffUser::Table, StaffUser::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rebuttal_dispute_id")
                    .table(Rebuttal::Table)
                    .col(Rebuttal::DisputeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Rebuttal::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum Rebuttal {
    Table,
    Id,
    DisputeId,
    AuthorId,
    Content,
    Evidence,
    CreatedAt,
}

#[derive(Iden)]
pub enum Dispute {
    Table,
    Id,
}

#[derive(Iden)]
pub enum StaffUser {
    Table,
    Id,
}
