//! JSON envelope and error mapping for API handlers
//!
//! Every response carries `success`. Failures are HTTP 400 with an `error`
//! message, whatever went wrong (bad JSON, unknown unit, parse error).

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::shared::error::AppError;
use crate::shared::errors::{CalcError, ConversionError, GraphError};

/// Successful body: `{"success": true, ...data}`
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    success: bool,
    #[serde(flatten)]
    data: T,
}

pub fn success<T: Serialize>(data: T) -> Json<Envelope<T>> {
    Json(Envelope { success: true, data })
}

/// Error returned by handlers, rendered as `{"success": false, "error": ...}`
#[derive(Debug)]
pub struct ApiError {
    message: String,
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        tracing::debug!(error = %err, "request failed");
        Self { message: err.to_string() }
    }
}

impl From<ConversionError> for ApiError {
    fn from(err: ConversionError) -> Self {
        AppError::from(err).into()
    }
}

impl From<CalcError> for ApiError {
    fn from(err: CalcError) -> Self {
        AppError::from(err).into()
    }
}

impl From<GraphError> for ApiError {
    fn from(err: GraphError) -> Self {
        AppError::from(err).into()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text()).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "success": false, "error": self.message }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

pub type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;
