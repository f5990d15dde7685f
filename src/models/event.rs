use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::entities::event_entity;

/// 创建活动请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CreateEventRequest {
    #[serde(default)]
    pub name: String,
    pub year: i32,
    /// 默认 true；激活新活动会停用其他所有活动
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventResponse {
    pub id: i32,
    pub name: String,
    pub year: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<event_entity::Model> for EventResponse {
    fn from(m: event_entity::Model) -> Self {
        EventResponse {
            id: m.id,
            name: m.name,
            year: m.year,
            is_active: m.is_active,
            created_at: m.created_at,
        }
    }
}
