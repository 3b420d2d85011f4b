use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Website::Table)
                    .if_not_exists()
                    .col(string(Website::Id).primary_key())
                    .col(string(Website::UserId))
                    .col(string(Website::Url))
                    .col(string(Website::Name).default(""))
                    .col(integer_null(Website::LastScore))
                    .col(timestamp_with_time_zone_null(Website::LastAnalyzedAt))
                    .col(
                        ColumnDef::new(Website::CreatedAt)
                            .timestamp_with_time_zone()
                            .default(Expr::current_timestamp())
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Website::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Website {
    Table,
    Id,
    UserId,
    Url,
    Name,
    LastScore,
    LastAnalyzedAt,
    CreatedAt,
}
