//! Unit conversion endpoints

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::api::error::{success, ApiResult};
use crate::core::features::unit_converter::{self, format_number, resolve_category, Category};
use crate::shared::types::{ConvertAllEntry, ConvertAllRequest, ConvertAllResponse, ConvertRequest, ConvertResponse};

/// `POST /api/convert`
pub async fn convert(payload: Result<Json<ConvertRequest>, JsonRejection>) -> ApiResult<ConvertResponse> {
    let Json(req) = payload?;
    let value = unit_converter::convert(&req.category, &req.from_unit, &req.to_unit, req.value)?;
    Ok(success(ConvertResponse { result: format_number(value), value }))
}

/// `POST /api/convert-all`, category defaults to Length
pub async fn convert_all(payload: Result<Json<ConvertAllRequest>, JsonRejection>) -> ApiResult<ConvertAllResponse> {
    let Json(req) = payload?;
    convert_all_with_default(req, Category::Length)
}

/// `POST /api/convert-misc`, category defaults to Angle
pub async fn convert_misc(payload: Result<Json<ConvertAllRequest>, JsonRejection>) -> ApiResult<ConvertAllResponse> {
    let Json(req) = payload?;
    convert_all_with_default(req, Category::Angle)
}

fn convert_all_with_default(req: ConvertAllRequest, default: Category) -> ApiResult<ConvertAllResponse> {
    let category = match req.category.as_deref() {
        Some(name) => resolve_category(name)?,
        None => default,
    };

    let results = unit_converter::convert_all_in(category, &req.from_unit, req.value)?
        .into_iter()
        .map(ConvertAllEntry::from)
        .collect();
    Ok(success(ConvertAllResponse { results }))
}
