//! Accounts API endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use wealthweb_core::{Account, AccountPatch, NewAccount};

use crate::error::ApiResult;
use crate::AppState;

pub async fn list_accounts(state: State<AppState>) -> Json<Vec<Account>> {
    let wealth = state.wealth.read().await;
    Json(wealth.snapshot().accounts.clone())
}

pub async fn create_account(
    state: State<AppState>,
    Json(new): Json<NewAccount>,
) -> ApiResult<(StatusCode, Json<Account>)> {
    let mut wealth = state.wealth.write().await;
    let account = wealth.add_account(new)?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub async fn update_account(
    state: State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<AccountPatch>,
) -> ApiResult<Json<Account>> {
    let mut wealth = state.wealth.write().await;
    Ok(Json(wealth.update_account(&id, patch)?))
}

/// Deletes the account together with its transactions
pub async fn delete_account(state: State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Value>> {
    let mut wealth = state.wealth.write().await;
    let (account, removed) = wealth.delete_account(&id)?;
    Ok(Json(json!({
        "account": account,
        "removedTransactions": removed.len(),
    })))
}

pub async fn merge_duplicates(state: State<AppState>) -> ApiResult<Json<Value>> {
    let mut wealth = state.wealth.write().await;
    let removed = wealth.merge_duplicate_accounts()?;
    Ok(Json(json!({ "removed": removed })))
}
