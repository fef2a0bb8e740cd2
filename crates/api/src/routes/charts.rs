//! Chart routes
//!
//! `GET /charts/{chart_type}` renders a pie, bar, line or area chart over the
//! sales table. Query parameters are camelCase, see [`ChartParams`].

use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};

use tally_analytics::{ChartData, ChartType};

use crate::error::Result;
use crate::request_id::RequestId;
use crate::state::AppState;
use crate::types::ChartParams;

/// Build the charts router
pub fn routes() -> Router<AppState> {
    Router::new().route("/charts/{chart_type}", get(get_chart))
}

/// GET /charts/{chart_type}
///
/// The chart type is checked before any parameter, so an unknown type is
/// reported even when the query string is also wrong.
async fn get_chart(
    State(state): State<AppState>,
    Path(chart_type): Path<String>,
    params: std::result::Result<Query<ChartParams>, QueryRejection>,
    Extension(request_id): Extension<RequestId>,
) -> Result<Json<ChartData>> {
    let chart_type: ChartType = chart_type.parse()?;
    let Query(params) = params?;
    let query = params.to_query()?;

    tracing::debug!(
        chart = %chart_type,
        request_id = request_id.as_str(),
        start = %query.start_date,
        end = %query.end_date,
        metric = %query.metric,
        "rendering chart"
    );

    let data = state.charts.render(chart_type, &query).await?;
    Ok(Json(data))
}
