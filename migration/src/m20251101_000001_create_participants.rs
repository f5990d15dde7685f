use sea_orm_migration::prelude::*;

/// 活动（每年一次的抽签活动，同一时间仅一个处于激活状态）
#[derive(DeriveIden)]
enum Events {
    Table,
    Id,
    Name,
    Year,
    IsActive,
    CreatedAt,
}

/// 参与者
#[derive(DeriveIden)]
enum Participants {
    Table,
    Id,
    Name,
    Email,
    CreatedAt,
}

/// 参与者别名（大小写不敏感，用于按名字查询）
#[derive(DeriveIden)]
enum ParticipantAliases {
    Table,
    Id,
    ParticipantId,
    Alias,
}

/// 排除规则（无序对，例如情侣互不抽中）
#[derive(DeriveIden)]
enum ExclusionRules {
    Table,
    Id,
    Participant1Id,
    Participant2Id,
    Reason,
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
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::Name).string_len(255).not_null())
                    .col(ColumnDef::new(Events::Year).integer().not_null())
                    .col(
                        ColumnDef::new(Events::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Events::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Participants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Participants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Participants::Name)
                            .string_len(255)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Participants::Email).string_len(255).null())
                    .col(
                        ColumnDef::new(Participants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // 显示名唯一
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_participants_name_unique")
                    .table(Participants::Table)
                    .col(Participants::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ParticipantAliases::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ParticipantAliases::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ParticipantAliases::ParticipantId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ParticipantAliases::Alias)
                            .string_len(255)
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_participant_aliases_participant")
                            .from(ParticipantAliases::Table, ParticipantAliases::ParticipantId)
                            .to(Participants::Table, Participants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_participant_aliases_participant")
                    .table(ParticipantAliases::Table)
                    .col(ParticipantAliases::ParticipantId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ExclusionRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ExclusionRules::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ExclusionRules::Participant1Id)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ExclusionRules::Participant2Id)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(ExclusionRules::Reason).string_len(255).null())
                    .col(
                        ColumnDef::new(ExclusionRules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_exclusion_rules_participant1")
                            .from(ExclusionRules::Table, ExclusionRules::Participant1Id)
                            .to(Participants::Table, Participants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_exclusion_rules_participant2")
                            .from(ExclusionRules::Table, ExclusionRules::Participant2Id)
                            .to(Participants::Table, Participants::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 删除顺序：排除规则 -> 别名 -> 参与者 -> 活动
        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(ExclusionRules::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(ParticipantAliases::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(
                Table::drop()
                    .if_exists()
                    .table(Participants::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().if_exists().table(Events::Table).to_owned())
            .await?;

        Ok(())
    }
}
