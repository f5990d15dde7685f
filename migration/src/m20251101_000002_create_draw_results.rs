use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Participants {
    Table,
    Id,
}

/// 抽签结果（每个活动每位参与者一行：送礼人 -> 收礼人）
#[derive(DeriveIden)]
enum DrawResults {
    Table,
    Id,
    EventId,
    ParticipantId,
    DrawsForId,
    CreatedAt,
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(DrawResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(DrawResults::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(DrawResults::EventId).integer().not_null())
                    .col(
                        ColumnDef::new(DrawResults::ParticipantId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(DrawResults::DrawsForId).integer().not_null())
                    .col(
                        ColumnDef::new(DrawResults::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_draw_results_event")
                            .from(DrawResults::Table, DrawResults::EventId)
                            .to(Events::Table, Events::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_draw_results_participant")
                            .from(DrawResults::Table, DrawResults::ParticipantId)
                            .to(Participants::Table, Participants::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_draw_results_draws_for")
                            .from(DrawResults::Table, DrawResults::DrawsForId)
                            .to(Participants::Table, Participants::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // 一个活动内每位参与者只能有一行；并发写入时失败方回退为重新读取
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_draw_results_event_participant_unique")
                    .table(DrawResults::Table)
                    .col(DrawResults::EventId)
                    .col(DrawResults::ParticipantId)
                    .unique()
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
                    .table(DrawResults::Table)
                    .to_owned(),
            )
            .await?;
        Ok(())
    }
}
