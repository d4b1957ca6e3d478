use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::data::models::WordError;

impl WordError {
    pub fn status(&self) -> StatusCode {
        match self {
            WordError::NotFound => StatusCode::NOT_FOUND,
            WordError::Duplicate(_) | WordError::Conflict => StatusCode::CONFLICT,
            WordError::ValidationError(_) => StatusCode::BAD_REQUEST,
            WordError::DatabaseError(_) | WordError::PoolError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for WordError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            WordError::DatabaseError(e) => {
                log::error!("Database error: {}", e);
                format!("Database error: {}", e)
            }
            WordError::PoolError(e) => {
                log::error!("Connection pool error: {}", e);
                self.to_string()
            }
            _ => self.to_string(),
        };

        let body = json!({
            "error": message,
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}
