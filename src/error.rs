use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ApiResponse;
use crate::utils::DrawError;

pub type AppResult<T> = Result<T, AppError>;

/// 提示给终端用户的“不在名单中”文案
pub const NOT_ON_LIST_MESSAGE: &str = "You are not on the participant list.";

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sea_orm::DbErr),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("No active event found")]
    NoActiveEvent,

    #[error("Draw result not found for participant {participant_id} in event {event_id}")]
    AssignmentMissing { event_id: i32, participant_id: i32 },

    #[error("Draw error: {0}")]
    DrawError(#[from] DrawError),

    #[error("Config error: {0}")]
    ConfigError(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::ParticipantNotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let (error_code, message) = match self {
            AppError::ValidationError(msg) => {
                log::warn!("Validation error: {msg}");
                ("VALIDATION_ERROR", msg.clone())
            }
            AppError::NotFound(msg) => ("NOT_FOUND", msg.clone()),
            AppError::ParticipantNotFound(name) => {
                log::info!("Lookup for unknown participant: {name:?}");
                ("PARTICIPANT_NOT_FOUND", NOT_ON_LIST_MESSAGE.to_string())
            }
            AppError::Conflict(msg) => {
                log::warn!("Conflict: {msg}");
                ("CONFLICT", msg.clone())
            }
            AppError::NoActiveEvent => {
                log::error!("No active event found");
                ("NO_ACTIVE_EVENT", "No active event found".to_string())
            }
            AppError::AssignmentMissing { .. } => {
                log::error!("Data integrity error: {self}");
                (
                    "ASSIGNMENT_MISSING",
                    "Draw result not found for participant".to_string(),
                )
            }
            AppError::DrawError(err) => {
                log::error!("Draw configuration error: {err}");
                ("DRAW_CONFIGURATION_ERROR", err.to_string())
            }
            AppError::DatabaseError(err) => {
                log::error!("Database error: {err}");
                ("DATABASE_ERROR", "Database error".to_string())
            }
            _ => {
                log::error!("Internal error: {self}");
                ("INTERNAL_ERROR", "Internal server error".to_string())
            }
        };

        HttpResponse::build(self.status_code()).json(ApiResponse::error(error_code, &message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::ParticipantNotFound("Zzz".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::AssignmentMissing {
                event_id: 1,
                participant_id: 2
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::from(DrawError::InfeasibleExclusions { attempts: 1000 }).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            AppError::NoActiveEvent.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
