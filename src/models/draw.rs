use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// 查询抽签结果请求
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CheckResultRequest {
    /// 名字或别名（大小写不敏感）
    #[serde(default)]
    pub name: String,
}

/// 查询抽签结果响应
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckResultResponse {
    /// 需要为其准备礼物的人
    pub draws_for: String,
}

/// 活动抽签状态（管理端，不暴露具体配对）
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DrawStatusResponse {
    pub event_id: i32,
    pub drawn: bool,
    pub pairs: u64,
}

/// 重置抽签结果
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResetDrawResponse {
    pub event_id: i32,
    pub rows_deleted: u64,
}
