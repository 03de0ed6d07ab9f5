use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::{ConnectionTrait, DbBackend};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 先以可空列加入，避免已有数据违反约束
        manager
            .alter_table(
                Table::alter()
                    .table(Groups::Table)
                    .add_column(ColumnDef::new(Groups::Title).string_len(255).null())
                    .to_owned(),
            )
            .await?;

        // 回填默认标题 "Project #<id>"
        let backfill = match manager.get_database_backend() {
            DbBackend::MySql => {
                "UPDATE tgi_groups SET title = CONCAT('Project #', id) WHERE title IS NULL OR title = ''"
            }
            _ => {
                "UPDATE tgi_groups SET title = 'Project #' || CAST(id AS TEXT) WHERE title IS NULL OR title = ''"
            }
        };
        manager.get_connection().execute_unprepared(backfill).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .alter_table(
                Table::alter()
                    .table(Groups::Table)
                    .drop_column(Groups::Title)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Groups {
    #[sea_orm(iden = "tgi_groups")]
    Table,
    Title,
}
