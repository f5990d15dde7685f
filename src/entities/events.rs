use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// 抽签活动实体
/// - 同一时间最多一个活动处于激活状态 (is_active)
/// - 抽签结果按活动保存
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub year: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::draw_results::Entity")]
    DrawResults,
}

impl Related<super::draw_results::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DrawResults.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
