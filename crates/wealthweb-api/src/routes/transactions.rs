//! Transactions API endpoints
//!
//! Listing with pagination, single-entry CRUD, bulk import from JSON rows or
//! CSV text, and the full balance recalculation.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use wealthweb_core::{
    CoreError, DayGroup, ImportSummary, NewTransaction, Transaction, TransactionPatch, TransactionsResponse,
};
use wealthweb_import::{parser_for, ImportRow};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: usize,
}

/// Most recently inserted first
pub async fn list_transactions(
    state: State<AppState>,
    Query(page): Query<PageQuery>,
) -> Json<TransactionsResponse> {
    let wealth = state.wealth.read().await;
    let snapshot = wealth.snapshot();
    let transactions = snapshot
        .list_transactions(page.limit, page.offset)
        .into_iter()
        .cloned()
        .collect();

    Json(TransactionsResponse {
        transactions,
        total_count: snapshot.transactions.len(),
        offset: page.offset,
        limit: page.limit,
    })
}

/// Grouped by calendar day, newest day first
pub async fn transaction_history(state: State<AppState>) -> Json<Vec<DayGroup>> {
    let wealth = state.wealth.read().await;
    Json(wealth.snapshot().history())
}

pub async fn get_transaction(state: State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Transaction>> {
    let wealth = state.wealth.read().await;
    wealth
        .snapshot()
        .transaction(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("transaction {}", id)))
}

pub async fn create_transaction(
    state: State<AppState>,
    Json(new): Json<NewTransaction>,
) -> ApiResult<(StatusCode, Json<Transaction>)> {
    let mut wealth = state.wealth.write().await;
    let tx = wealth.add_transaction(new)?;
    Ok((StatusCode::CREATED, Json(tx)))
}

pub async fn update_transaction(
    state: State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TransactionPatch>,
) -> ApiResult<Json<Transaction>> {
    let mut wealth = state.wealth.write().await;
    wealth
        .update_transaction(&id, &patch)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("transaction {}", id)))
}

pub async fn delete_transaction(state: State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Transaction>> {
    let mut wealth = state.wealth.write().await;
    wealth
        .delete_transaction(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("transaction {}", id)))
}

/// Bulk import from an array of row objects
pub async fn import_rows(
    state: State<AppState>,
    Json(rows): Json<Vec<ImportRow>>,
) -> ApiResult<Json<ImportSummary>> {
    let mut wealth = state.wealth.write().await;
    Ok(Json(wealth.import_rows(&rows)?))
}

/// Bulk import from a raw `csv` or `json` request body
pub async fn import_file(
    state: State<AppState>,
    Path(format): Path<String>,
    body: String,
) -> ApiResult<Json<ImportSummary>> {
    let parser = parser_for(&format).map_err(CoreError::from)?;
    let mut wealth = state.wealth.write().await;
    Ok(Json(wealth.import_payload(parser.as_ref(), &body)?))
}

pub async fn recalculate(state: State<AppState>) -> ApiResult<Json<Value>> {
    let mut wealth = state.wealth.write().await;
    let drift = wealth.recalculate_all_balances()?;
    Ok(Json(json!({
        "corrected": drift,
        "netWorth": wealth.net_worth(),
    })))
}
