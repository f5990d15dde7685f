use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::participant_entity;

/// 参与者及其别名（名字匹配使用，不依赖数据库）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantProfile {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub alternative_names: Vec<String>,
}

impl ParticipantProfile {
    pub fn from_model(m: participant_entity::Model, alternative_names: Vec<String>) -> Self {
        ParticipantProfile {
            id: m.id,
            name: m.name,
            email: m.email,
            alternative_names,
        }
    }
}

/// 新增参与者请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateParticipantRequest {
    /// 显示名
    #[serde(default)]
    pub name: String,
    pub email: Option<String>,
    /// 别名（大小写不敏感）
    #[serde(default)]
    pub alternative_names: Vec<String>,
}

/// 参与者信息（管理端）
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ParticipantResponse {
    pub id: i32,
    pub name: String,
    pub email: Option<String>,
    pub alternative_names: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ParticipantResponse {
    pub fn new(m: participant_entity::Model, alternative_names: Vec<String>) -> Self {
        ParticipantResponse {
            id: m.id,
            name: m.name,
            email: m.email,
            alternative_names,
            created_at: m.created_at,
        }
    }
}

/// 删除参与者的结果
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DeleteParticipantResponse {
    pub id: i32,
    /// 被清除的排除规则数
    pub exclusions_removed: u64,
    /// 被清除抽签结果的活动数（这些活动下次查询时会重新抽签）
    pub draws_invalidated: u64,
}
