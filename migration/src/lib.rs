pub use sea_orm_migration::prelude::*;

mod m20250123_000001_create_tables;
mod m20250814_000001_add_group_title;
mod m20250901_000001_normalize_legacy_values;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250123_000001_create_tables::Migration),
            Box::new(m20250814_000001_add_group_title::Migration),
            Box::new(m20250901_000001_normalize_legacy_values::Migration),
        ]
    }
}
