use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use venu_core::ReviewError;

/// Translates engine rejections into HTTP responses. Every failure a
/// handler can produce is a `ReviewError`; 503 bodies carry a generic
/// retry hint instead of backend detail.
#[derive(Debug)]
pub struct AppError(ReviewError);

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        AppError(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = match &err {
            ReviewError::InvalidRating(_) | ReviewError::InvalidComment(_) => {
                StatusCode::BAD_REQUEST
            }
            ReviewError::EventNotFound => StatusCode::NOT_FOUND,
            ReviewError::EventNotEnded | ReviewError::NotConfirmedAttendee => {
                StatusCode::FORBIDDEN
            }
            ReviewError::AlreadyReviewed => StatusCode::CONFLICT,
            ReviewError::Unavailable(msg) => {
                tracing::error!("store unavailable: {}", msg);
                StatusCode::SERVICE_UNAVAILABLE
            }
        };

        let message = if status == StatusCode::SERVICE_UNAVAILABLE {
            "service temporarily unavailable, retry the request".to_string()
        } else {
            err.to_string()
        };

        let body = Json(json!({
            "error": {
                "kind": err.kind(),
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}
