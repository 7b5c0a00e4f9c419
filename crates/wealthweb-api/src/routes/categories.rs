//! Categories, asset classes and category breakdown endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use wealthweb_core::{AssetClass, Category, CategoryBreakdown, CategoryType, NewCategory};

use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TypeQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

impl TypeQuery {
    fn category_type(&self) -> ApiResult<Option<CategoryType>> {
        self.kind
            .as_deref()
            .map(|k| k.parse::<CategoryType>().map_err(ApiError::bad_request))
            .transpose()
    }
}

/// `?type=INCOME|EXPENSE` narrows the list
pub async fn list_categories(
    state: State<AppState>,
    Query(query): Query<TypeQuery>,
) -> ApiResult<Json<Vec<Category>>> {
    let kind = query.category_type()?;
    let wealth = state.wealth.read().await;
    let snapshot = wealth.snapshot();
    let categories: Vec<Category> = match kind {
        Some(kind) => snapshot.categories_by_type(kind).into_iter().cloned().collect(),
        None => snapshot.categories.clone(),
    };
    Ok(Json(categories))
}

pub async fn create_category(
    state: State<AppState>,
    Json(new): Json<NewCategory>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let mut wealth = state.wealth.write().await;
    Ok((StatusCode::CREATED, Json(wealth.add_category(new)?)))
}

pub async fn delete_category(state: State<AppState>, Path(id): Path<String>) -> ApiResult<Json<Category>> {
    let mut wealth = state.wealth.write().await;
    Ok(Json(wealth.delete_category(&id)?))
}

/// Current-month totals per category, `?type=` defaults to EXPENSE
pub async fn category_breakdown(
    state: State<AppState>,
    Query(query): Query<TypeQuery>,
) -> ApiResult<Json<CategoryBreakdown>> {
    let kind = query.category_type()?.unwrap_or(CategoryType::Expense);
    let wealth = state.wealth.read().await;
    Ok(Json(wealth.category_breakdown(kind)))
}

// ==================== Asset classes ====================

#[derive(Debug, Deserialize)]
pub struct NewAssetClass {
    pub name: String,
}

pub async fn list_asset_classes(state: State<AppState>) -> Json<Vec<AssetClass>> {
    let wealth = state.wealth.read().await;
    Json(wealth.snapshot().asset_classes.clone())
}

pub async fn create_asset_class(
    state: State<AppState>,
    Json(new): Json<NewAssetClass>,
) -> ApiResult<(StatusCode, Json<AssetClass>)> {
    let mut wealth = state.wealth.write().await;
    Ok((StatusCode::CREATED, Json(wealth.add_asset_class(&new.name)?)))
}

pub async fn delete_asset_class(state: State<AppState>, Path(id): Path<String>) -> ApiResult<Json<AssetClass>> {
    let mut wealth = state.wealth.write().await;
    wealth
        .delete_asset_class(&id)?
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("asset class {}", id)))
}
