use sea_orm_migration::prelude::*;

use super::m20260101_000001_create_users::Users;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Pages::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Pages::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Pages::CreatedBy).big_integer().not_null())
                    .col(ColumnDef::new(Pages::Position).double().not_null())
                    .col(ColumnDef::new(Pages::IsTopLevel).boolean().not_null())
                    .col(ColumnDef::new(Pages::TextTitle).string().null())
                    .col(ColumnDef::new(Pages::TextContent).text().null())
                    .col(ColumnDef::new(Pages::Title).json().null())
                    .col(ColumnDef::new(Pages::Content).json().null())
                    .col(
                        ColumnDef::new(Pages::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Pages::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Pages::Table, Pages::CreatedBy)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_pages_created_by_created_at")
                    .table(Pages::Table)
                    .col(Pages::CreatedBy)
                    .col(Pages::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Pages::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Pages {
    Table,
    Id,
    CreatedBy,
    Position,
    IsTopLevel,
    TextTitle,
    TextContent,
    Title,
    Content,
    CreatedAt,
    UpdatedAt,
}
