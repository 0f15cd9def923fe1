//! Create staff user table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(StaffUser::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StaffUser::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StaffUser::Name).string_len(128).not_null())
                    .col(
                        ColumnDef::new(StaffUser::Email)
                            .string_len(256)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(StaffUser::Role)
                            .string_len(16)
                            .not_null()
                            .default("AGENT"),
                    )
                    .col(
                        ColumnDef::new(StaffUser::Token)
                            .string_len(128)
                            .null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(StaffUser::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StaffUser::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum StaffUser {
    Table,
    Id,
    Name,
    Email,
    Role,
    Token,
    CreatedAt,
}
