use sea_orm_migration::{prelude::*, schema::*};

use crate::m20251019_101500_create_website_table::Website;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Report::Table)
                    .if_not_exists()
                    .col(string(Report::Id).primary_key())
                    .col(string(Report::WebsiteId))
                    .col(string(Report::UserId))
                    .col(string(Report::Url))
                    .col(integer(Report::Score))
                    .col(big_integer(Report::IssueCount))
                    .col(json(Report::Payload))
                    .col(
                        ColumnDef::new(Report::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_report_website_id")
                            .from(Report::Table, Report::WebsiteId)
                            .to(Website::Table, Website::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Report::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Report {
    Table,
    Id,
    WebsiteId,
    UserId,
    Url,
    Score,
    IssueCount,
    Payload,
    CreatedAt,
}
