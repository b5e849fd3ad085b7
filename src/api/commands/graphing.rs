//! Graph sampling endpoint

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;

use crate::api::error::{success, ApiResult};
use crate::config::ServerConfig;
use crate::core::features::graphing;
use crate::shared::types::{GraphSampleRequest, GraphSampleResponse};

/// `POST /api/graph-sample`
pub async fn graph_sample(
    State(config): State<Arc<ServerConfig>>,
    payload: Result<Json<GraphSampleRequest>, JsonRejection>,
) -> ApiResult<GraphSampleResponse> {
    let Json(req) = payload?;
    let plot = graphing::plot(&req.expr, req.xmin, req.xmax, req.samples, config.max_graph_samples, None)?;

    Ok(success(GraphSampleResponse {
        xs: plot.sample.xs,
        ys: plot.sample.ys,
        ymin: plot.y_range.map(|r| r.min),
        ymax: plot.y_range.map(|r| r.max),
    }))
}
