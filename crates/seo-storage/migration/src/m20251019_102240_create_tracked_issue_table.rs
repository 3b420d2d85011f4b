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
                    .table(TrackedIssue::Table)
                    .if_not_exists()
                    .col(string(TrackedIssue::Id).primary_key())
                    .col(string(TrackedIssue::WebsiteId))
                    .col(string(TrackedIssue::UserId))
                    .col(string(TrackedIssue::IssueType))
                    .col(string(TrackedIssue::Status))
                    .col(timestamp_with_time_zone(TrackedIssue::FirstDetectedAt))
                    // Full record, the columns above are for filtering.
                    .col(json(TrackedIssue::Data))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tracked_issue_website_id")
                            .from(TrackedIssue::Table, TrackedIssue::WebsiteId)
                            .to(Website::Table, Website::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tracked_issue_website_type")
                    .table(TrackedIssue::Table)
                    .col(TrackedIssue::WebsiteId)
                    .col(TrackedIssue::IssueType)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TrackedIssue::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum TrackedIssue {
    Table,
    Id,
    WebsiteId,
    UserId,
    IssueType,
    Status,
    FirstDetectedAt,
    Data,
}
