use crate::models::ApiResponse;
use crate::services::ParticipantService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/participants",
    tag = "participant",
    responses(
        (status = 200, description = "参与者显示名列表（已排序）", body = [String]),
        (status = 500, description = "服务器错误")
    )
)]
/// 获取所有参与者显示名（排序后）
pub async fn list_names(service: web::Data<ParticipantService>) -> Result<HttpResponse> {
    match service.list_names().await {
        Ok(names) => Ok(HttpResponse::Ok().json(ApiResponse::success(names))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn participant_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/participants", web::get().to(list_names));
}
