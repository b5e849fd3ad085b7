//! Basic calculator endpoint

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::api::error::{success, ApiResult};
use crate::core::features::calculator::evaluate_expression;
use crate::core::features::unit_converter::format_number;
use crate::shared::types::{CalculateRequest, CalculateResponse};

/// `POST /api/calculate`
pub async fn calculate(payload: Result<Json<CalculateRequest>, JsonRejection>) -> ApiResult<CalculateResponse> {
    let Json(req) = payload?;
    let value = evaluate_expression(&req.expr)?;
    Ok(success(CalculateResponse { result: format_number(value) }))
}
