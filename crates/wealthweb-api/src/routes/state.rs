//! Backup, template and user profile endpoints

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use wealthweb_core::UserProfile;
use wealthweb_import::ImportTemplate;

use crate::error::ApiResult;
use crate::AppState;

/// Full state as a JSON document
pub async fn export_state(state: State<AppState>) -> ApiResult<impl IntoResponse> {
    let wealth = state.wealth.read().await;
    let json = wealth.export_json()?;
    Ok(([(header::CONTENT_TYPE, "application/json")], json))
}

/// Replace the whole state; the document needs at least `user` and `accounts`
pub async fn restore_state(state: State<AppState>, Json(backup): Json<Value>) -> ApiResult<Json<Value>> {
    let mut wealth = state.wealth.write().await;
    wealth.restore_backup(backup)?;
    let snapshot = wealth.snapshot();
    Ok(Json(json!({
        "accounts": snapshot.accounts.len(),
        "transactions": snapshot.transactions.len(),
    })))
}

pub async fn import_template(state: State<AppState>) -> ApiResult<Json<ImportTemplate>> {
    let wealth = state.wealth.read().await;
    Ok(Json(wealth.import_template()?))
}

#[derive(Debug, Default, Deserialize)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub currency: Option<String>,
}

pub async fn get_user(state: State<AppState>) -> Json<UserProfile> {
    let wealth = state.wealth.read().await;
    Json(wealth.snapshot().user.clone())
}

pub async fn update_user(state: State<AppState>, Json(update): Json<UserUpdate>) -> ApiResult<Json<UserProfile>> {
    let mut wealth = state.wealth.write().await;
    wealth.update_profile(update.name.as_deref(), update.currency.as_deref())?;
    Ok(Json(wealth.snapshot().user.clone()))
}
