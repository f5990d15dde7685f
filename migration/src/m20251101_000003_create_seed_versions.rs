use sea_orm_migration::prelude::*;

/// 已应用的初始数据版本
/// 用显式版本号判断是否需要导入初始数据，而不是比较参与者数量
#[derive(DeriveIden)]
enum SeedVersions {
    Table,
    Version,
    AppliedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SeedVersions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SeedVersions::Version)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SeedVersions::AppliedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(SeedVersions::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
