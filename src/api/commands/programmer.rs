//! Programmer calculator endpoint

use axum::extract::rejection::JsonRejection;
use axum::Json;

use crate::api::error::{success, ApiResult};
use crate::core::features::programmer::{self, Radix, WordSize};
use crate::shared::types::{ProgrammerRequest, ProgrammerResponse};

/// `POST /api/programmer`
pub async fn programmer(payload: Result<Json<ProgrammerRequest>, JsonRejection>) -> ApiResult<ProgrammerResponse> {
    let Json(req) = payload?;
    let radix: Radix = req.radix.parse()?;
    let word = WordSize::new(req.word_size)?;

    let result = programmer::evaluate(&req.lhs, &req.op, req.rhs.as_deref(), radix, word)?;
    Ok(success(ProgrammerResponse { result }))
}
