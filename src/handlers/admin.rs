use crate::models::*;
use crate::services::{DrawService, EventService, ExclusionService, ParticipantService};
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    get,
    path = "/admin/events",
    tag = "admin",
    responses(
        (status = 200, description = "活动列表", body = [EventResponse])
    )
)]
pub async fn list_events(service: web::Data<EventService>) -> Result<HttpResponse> {
    match service.list_events().await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/events",
    tag = "admin",
    request_body = CreateEventRequest,
    responses(
        (status = 200, description = "创建活动成功（默认激活并停用其他活动）", body = EventResponse),
        (status = 400, description = "参数错误")
    )
)]
pub async fn create_event(
    service: web::Data<EventService>,
    request: web::Json<CreateEventRequest>,
) -> Result<HttpResponse> {
    match service.create_event(request.into_inner()).await {
        Ok(event) => Ok(HttpResponse::Ok().json(ApiResponse::success(event))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/events/{id}/activate",
    tag = "admin",
    params(("id" = i32, Path, description = "活动ID")),
    responses(
        (status = 200, description = "激活成功", body = EventResponse),
        (status = 404, description = "活动不存在")
    )
)]
pub async fn activate_event(
    service: web::Data<EventService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match service.activate_event(path.into_inner()).await {
        Ok(event) => Ok(HttpResponse::Ok().json(ApiResponse::success(event))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/events/{id}/draw",
    tag = "admin",
    params(("id" = i32, Path, description = "活动ID")),
    responses(
        (status = 200, description = "抽签状态", body = DrawStatusResponse),
        (status = 404, description = "活动不存在")
    )
)]
pub async fn draw_status(
    service: web::Data<DrawService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match service.draw_status(path.into_inner()).await {
        Ok(status) => Ok(HttpResponse::Ok().json(ApiResponse::success(status))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/events/{id}/draw",
    tag = "admin",
    params(("id" = i32, Path, description = "活动ID")),
    responses(
        (status = 200, description = "已清除抽签结果，下次查询时重新抽签", body = ResetDrawResponse),
        (status = 404, description = "活动不存在")
    )
)]
pub async fn reset_draw(
    service: web::Data<DrawService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match service.reset_draw(path.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success_with_message(
            result,
            "Draw reset, it will be performed again on the next lookup".to_string(),
        ))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/participants",
    tag = "admin",
    responses(
        (status = 200, description = "参与者列表（含别名）", body = [ParticipantResponse])
    )
)]
pub async fn list_participants(service: web::Data<ParticipantService>) -> Result<HttpResponse> {
    match service.list_participants().await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/participants",
    tag = "admin",
    request_body = CreateParticipantRequest,
    responses(
        (status = 200, description = "新增参与者成功", body = ParticipantResponse),
        (status = 400, description = "参数错误"),
        (status = 409, description = "名字或别名已被使用")
    )
)]
pub async fn create_participant(
    service: web::Data<ParticipantService>,
    request: web::Json<CreateParticipantRequest>,
) -> Result<HttpResponse> {
    match service.create_participant(request.into_inner()).await {
        Ok(p) => Ok(HttpResponse::Ok().json(ApiResponse::success(p))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/participants/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "参与者ID")),
    responses(
        (status = 200, description = "删除成功，相关抽签结果与排除规则一并清除", body = DeleteParticipantResponse),
        (status = 404, description = "参与者不存在")
    )
)]
pub async fn delete_participant(
    service: web::Data<ParticipantService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    match service.delete_participant(path.into_inner()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(result))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/admin/exclusions",
    tag = "admin",
    responses(
        (status = 200, description = "排除规则列表", body = [ExclusionRuleResponse])
    )
)]
pub async fn list_exclusions(service: web::Data<ExclusionService>) -> Result<HttpResponse> {
    match service.list_exclusions().await {
        Ok(list) => Ok(HttpResponse::Ok().json(ApiResponse::success(list))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/admin/exclusions",
    tag = "admin",
    request_body = CreateExclusionRequest,
    responses(
        (status = 200, description = "新增排除规则成功", body = ExclusionRuleResponse),
        (status = 404, description = "参与者不存在"),
        (status = 409, description = "规则已存在")
    )
)]
pub async fn create_exclusion(
    service: web::Data<ExclusionService>,
    request: web::Json<CreateExclusionRequest>,
) -> Result<HttpResponse> {
    match service.create_exclusion(request.into_inner()).await {
        Ok(rule) => Ok(HttpResponse::Ok().json(ApiResponse::success(rule))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/admin/exclusions/{id}",
    tag = "admin",
    params(("id" = i32, Path, description = "排除规则ID")),
    responses(
        (status = 200, description = "删除成功"),
        (status = 404, description = "规则不存在")
    )
)]
pub async fn delete_exclusion(
    service: web::Data<ExclusionService>,
    path: web::Path<i32>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    match service.delete_exclusion(id).await {
        Ok(()) => Ok(HttpResponse::Ok().json(ApiResponse::success(id))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn admin_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .route("/events", web::get().to(list_events))
            .route("/events", web::post().to(create_event))
            .route("/events/{id}/activate", web::post().to(activate_event))
            .route("/events/{id}/draw", web::get().to(draw_status))
            .route("/events/{id}/draw", web::delete().to(reset_draw))
            .route("/participants", web::get().to(list_participants))
            .route("/participants", web::post().to(create_participant))
            .route("/participants/{id}", web::delete().to(delete_participant))
            .route("/exclusions", web::get().to(list_exclusions))
            .route("/exclusions", web::post().to(create_exclusion))
            .route("/exclusions/{id}", web::delete().to(delete_exclusion)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_pool;
    use crate::utils::{DEFAULT_MAX_ATTEMPTS, DrawLocks};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use serde_json::{Value, json};
    use std::sync::Arc;

    #[actix_web::test]
    async fn test_admin_flow() {
        let pool = test_pool().await;
        let locks = Arc::new(DrawLocks::new());
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(EventService::new(pool.clone())))
                .app_data(web::Data::new(ParticipantService::new(
                    pool.clone(),
                    locks.clone(),
                )))
                .app_data(web::Data::new(ExclusionService::new(pool.clone())))
                .app_data(web::Data::new(DrawService::new(
                    pool.clone(),
                    locks,
                    DEFAULT_MAX_ATTEMPTS,
                )))
                .service(web::scope("/api").configure(admin_config)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/admin/events")
            .set_json(json!({ "name": "Wigilia", "year": 2025 }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let event_id = body["data"]["id"].as_i64().unwrap();
        assert_eq!(body["data"]["is_active"], true);

        let mut ids = Vec::new();
        for name in ["Anna", "Marek", "Kasia"] {
            let req = test::TestRequest::post()
                .uri("/api/admin/participants")
                .set_json(json!({ "name": name }))
                .to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            ids.push(body["data"]["id"].as_i64().unwrap());
        }

        let req = test::TestRequest::post()
            .uri("/api/admin/participants")
            .set_json(json!({ "name": "anna" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::post()
            .uri("/api/admin/exclusions")
            .set_json(json!({
                "participant1_id": ids[0],
                "participant2_id": ids[1],
                "reason": "couple"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/admin/events/{event_id}/draw"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"]["drawn"], false);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/admin/participants/{}", ids[2]))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);

        let req = test::TestRequest::get()
            .uri("/api/admin/exclusions")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::delete()
            .uri("/api/admin/events/999/draw")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
