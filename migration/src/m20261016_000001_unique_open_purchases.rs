use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // at most one pending or active purchase per owner and feature
        let sql = r#"
            CREATE UNIQUE INDEX IF NOT EXISTS uq_purchased_features_open
            ON purchased_features (owner_type, owner_id, feature_id)
            WHERE status IN ('pending', 'active')
        "#;
        manager.get_connection().execute_unprepared(sql).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .get_connection()
            .execute_unprepared("DROP INDEX IF EXISTS uq_purchased_features_open")
            .await?;
        Ok(())
    }
}
