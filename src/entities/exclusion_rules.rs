use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 排除规则实体
/// 无序对：(participant1, participant2) 同时禁止两个方向的配对
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "exclusion_rules")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub participant1_id: i32,
    pub participant2_id: i32,
    /// 原因说明，例如 "couple"
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Model {
    pub fn pair(&self) -> (i32, i32) {
        (self.participant1_id, self.participant2_id)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::participants::Entity",
        from = "Column::Participant1Id",
        to = "super::participants::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Participant1,
    #[sea_orm(
        belongs_to = "super::participants::Entity",
        from = "Column::Participant2Id",
        to = "super::participants::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Participant2,
}

impl ActiveModelBehavior for ActiveModel {}
