pub use sea_orm_migration::prelude::*;

mod m20251019_101500_create_website_table;
mod m20251019_101812_create_report_table;
mod m20251019_102240_create_tracked_issue_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251019_101500_create_website_table::Migration),
            Box::new(m20251019_101812_create_report_table::Migration),
            Box::new(m20251019_102240_create_tracked_issue_table::Migration),
        ]
    }
}
