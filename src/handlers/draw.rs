use crate::models::*;
use crate::services::DrawService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/check-result",
    tag = "draw",
    request_body = CheckResultRequest,
    responses(
        (status = 200, description = "查询成功，返回需要准备礼物的人", body = CheckResultResponse),
        (status = 400, description = "名字为空"),
        (status = 404, description = "不在参与者名单中"),
        (status = 500, description = "没有激活的活动、抽签配置错误或结果缺失")
    )
)]
/// 按名字（或别名）查询抽签结果
/// 活动首次被查询时进行抽签，之后的查询只读取已保存的结果
pub async fn check_result(
    service: web::Data<DrawService>,
    request: web::Json<CheckResultRequest>,
) -> Result<HttpResponse> {
    match service.check_result(&request.name).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(result))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn draw_config(cfg: &mut web::ServiceConfig) {
    cfg.route("/check-result", web::post().to(check_result));
}
