//! Dashboard summary and trend endpoints

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use wealthweb_config::Lookback;
use wealthweb_core::{DashboardSummary, TrendReport};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

pub async fn summary(state: State<AppState>) -> Json<DashboardSummary> {
    let wealth = state.wealth.read().await;
    Json(wealth.dashboard_summary())
}

#[derive(Debug, Default, Deserialize)]
pub struct TrendQuery {
    /// `all`, `1y`, `6m` or `3m`
    pub range: Option<String>,
}

pub async fn trend(state: State<AppState>, Query(query): Query<TrendQuery>) -> ApiResult<Json<TrendReport>> {
    let lookback = match query.range.as_deref() {
        Some(range) => range.parse::<Lookback>().map_err(ApiError::bad_request)?,
        None => state.config.analytics.default_lookback,
    };
    let wealth = state.wealth.read().await;
    Ok(Json(wealth.trend(lookback)))
}
