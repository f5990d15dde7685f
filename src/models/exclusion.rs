use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::exclusion_rule_entity;

/// 新增排除规则请求（顺序无关）
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateExclusionRequest {
    pub participant1_id: i32,
    pub participant2_id: i32,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ExclusionRuleResponse {
    pub id: i32,
    pub participant1_id: i32,
    pub participant2_id: i32,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<exclusion_rule_entity::Model> for ExclusionRuleResponse {
    fn from(m: exclusion_rule_entity::Model) -> Self {
        ExclusionRuleResponse {
            id: m.id,
            participant1_id: m.participant1_id,
            participant2_id: m.participant2_id,
            reason: m.reason,
            created_at: m.created_at,
        }
    }
}
