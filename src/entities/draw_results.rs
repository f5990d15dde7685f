use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 抽签结果实体
/// 说明:
/// - 每个活动每位参与者一行 (event_id, participant_id 唯一)
/// - participant_id 为送礼人, draws_for_id 为收礼人
/// - 一个活动的结果总是整体写入或整体删除
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "draw_results")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub event_id: i32,
    pub participant_id: i32,
    pub draws_for_id: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Event,
    #[sea_orm(
        belongs_to = "super::participants::Entity",
        from = "Column::ParticipantId",
        to = "super::participants::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Giver,
    #[sea_orm(
        belongs_to = "super::participants::Entity",
        from = "Column::DrawsForId",
        to = "super::participants::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Recipient,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
