use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::participant::list_names,
        handlers::draw::check_result,
        handlers::admin::list_events,
        handlers::admin::create_event,
        handlers::admin::activate_event,
        handlers::admin::draw_status,
        handlers::admin::reset_draw,
        handlers::admin::list_participants,
        handlers::admin::create_participant,
        handlers::admin::delete_participant,
        handlers::admin::list_exclusions,
        handlers::admin::create_exclusion,
        handlers::admin::delete_exclusion,
    ),
    components(
        schemas(
            CheckResultRequest,
            CheckResultResponse,
            DrawStatusResponse,
            ResetDrawResponse,
            CreateEventRequest,
            EventResponse,
            CreateParticipantRequest,
            ParticipantResponse,
            DeleteParticipantResponse,
            CreateExclusionRequest,
            ExclusionRuleResponse,
            ApiError,
        )
    ),
    tags(
        (name = "participant", description = "Participant list API"),
        (name = "draw", description = "Draw result lookup API"),
        (name = "admin", description = "Event, participant and exclusion management API"),
    ),
    info(
        title = "Secret Santa Backend API",
        version = "1.0.0",
        description = "Secret Santa draw REST API documentation"
    ),
    servers(
        (url = "/api", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_lookup_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/check-result"));
        assert!(doc.paths.paths.contains_key("/participants"));
        assert!(doc.paths.paths.contains_key("/admin/events/{id}/draw"));
    }
}
