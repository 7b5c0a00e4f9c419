//! Savings goals endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;

use wealthweb_core::{Goal, GoalPatch, GoalProgress, NewGoal};

use crate::error::ApiResult;
use crate::AppState;

pub async fn list_goals(state: State<AppState>) -> Json<Vec<Goal>> {
    let wealth = state.wealth.read().await;
    Json(wealth.snapshot().goals.clone())
}

pub async fn create_goal(state: State<AppState>, Json(new): Json<NewGoal>) -> ApiResult<(StatusCode, Json<Goal>)> {
    let mut wealth = state.wealth.write().await;
    Ok((StatusCode::CREATED, Json(wealth.add_goal(new)?)))
}

pub async fn update_goal(
    state: State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<GoalPatch>,
) -> ApiResult<Json<Goal>> {
    let mut wealth = state.wealth.write().await;
    Ok(Json(wealth.update_goal(&id, patch)?))
}

pub async fn delete_goal(state: State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Goal>> {
    let mut wealth = state.wealth.write().await;
    Ok(Json(wealth.delete_goal(&id)?))
}

#[derive(Debug, Deserialize)]
pub struct Contribution {
    pub amount: Decimal,
}

pub async fn contribute(
    state: State<AppState>,
    Path(id): Path<String>,
    Json(contribution): Json<Contribution>,
) -> ApiResult<Json<Goal>> {
    let mut wealth = state.wealth.write().await;
    Ok(Json(wealth.contribute_to_goal(&id, contribution.amount)?))
}

pub async fn goal_progress(state: State<AppState>, Path(id): Path<String>) -> ApiResult<Json<GoalProgress>> {
    let wealth = state.wealth.read().await;
    Ok(Json(wealth.goal_progress(&id)?))
}

pub async fn all_progress(state: State<AppState>) -> Json<Vec<GoalProgress>> {
    let wealth = state.wealth.read().await;
    Json(wealth.all_goal_progress())
}
