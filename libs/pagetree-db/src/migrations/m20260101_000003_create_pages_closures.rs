use sea_orm_migration::prelude::*;

use super::m20260101_000002_create_pages::Pages;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PagesClosures::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PagesClosures::AncestorId).uuid().not_null())
                    .col(ColumnDef::new(PagesClosures::DescendantId).uuid().not_null())
                    .col(ColumnDef::new(PagesClosures::IsParent).boolean().not_null())
                    .primary_key(
                        Index::create()
                            .col(PagesClosures::AncestorId)
                            .col(PagesClosures::DescendantId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PagesClosures::Table, PagesClosures::AncestorId)
                            .to(Pages::Table, Pages::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PagesClosures::Table, PagesClosures::DescendantId)
                            .to(Pages::Table, Pages::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_pages_closures_descendant")
                    .table(PagesClosures::Table)
                    .col(PagesClosures::DescendantId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PagesClosures::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PagesClosures {
    Table,
    AncestorId,
    DescendantId,
    IsParent,
}
