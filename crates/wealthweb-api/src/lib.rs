//! HTTP JSON API over the wealth ledger
//!
//! Routes are organized into modules:
//! - routes::accounts, routes::categories, routes::transactions, routes::goals
//! - routes::reports: summary and trend views
//! - routes::state: backup, template and user profile

pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;

use wealthweb_config::Config;
use wealthweb_core::Wealth;

pub use error::{ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub wealth: Arc<RwLock<Wealth>>,
    pub config: Config,
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::accounts::{create_account, delete_account, list_accounts, merge_duplicates, update_account};
    use routes::categories::{
        category_breakdown, create_asset_class, create_category, delete_asset_class, delete_category,
        list_asset_classes, list_categories,
    };
    use routes::goals::{all_progress, contribute, create_goal, delete_goal, goal_progress, list_goals, update_goal};
    use routes::reports::{summary, trend};
    use routes::state::{export_state, get_user, import_template, restore_state, update_user};
    use routes::transactions::{
        create_transaction, delete_transaction, get_transaction, import_file, import_rows,
        list_transactions, recalculate, transaction_history, update_transaction,
    };

    Router::new()
        .route("/api/health", get(health_check))
        // State
        .route("/api/state", get(export_state))
        .route("/api/state/restore", post(restore_state))
        .route("/api/template", get(import_template))
        .route("/api/user", get(get_user).put(update_user))
        // Accounts
        .route("/api/accounts", get(list_accounts).post(create_account))
        .route("/api/accounts/merge-duplicates", post(merge_duplicates))
        .route("/api/accounts/:id", put(update_account).delete(delete_account))
        // Categories and asset classes
        .route("/api/categories", get(list_categories).post(create_category))
        .route("/api/categories/breakdown", get(category_breakdown))
        .route("/api/categories/:id", axum::routing::delete(delete_category))
        .route("/api/asset-classes", get(list_asset_classes).post(create_asset_class))
        .route("/api/asset-classes/:id", axum::routing::delete(delete_asset_class))
        // Transactions
        .route("/api/transactions", get(list_transactions).post(create_transaction))
        .route("/api/transactions/history", get(transaction_history))
        .route("/api/transactions/import", post(import_rows))
        .route("/api/transactions/import/:format", post(import_file))
        .route(
            "/api/transactions/:id",
            get(get_transaction).put(update_transaction).delete(delete_transaction),
        )
        .route("/api/recalculate", post(recalculate))
        // Goals
        .route("/api/goals", get(list_goals).post(create_goal))
        .route("/api/goals/progress", get(all_progress))
        .route("/api/goals/:id", put(update_goal).delete(delete_goal))
        .route("/api/goals/:id/progress", get(goal_progress))
        .route("/api/goals/:id/contribute", post(contribute))
        // Views
        .route("/api/summary", get(summary))
        .route("/api/trend", get(trend))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Bind and serve until the listener fails
pub async fn start_server(config: Config, wealth: Arc<RwLock<Wealth>>) -> std::io::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState { wealth, config };
    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!(target: "wealthweb::api", "Starting WealthWeb server on http://{}", addr);
    log::info!(target: "wealthweb::api", "JSON API available under /api/*");

    axum::serve(listener, router).await?;
    log::info!(target: "wealthweb::api", "Server stopped gracefully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let config = Config::default();
        let wealth = Wealth::in_memory(&config).unwrap();
        create_router(AppState {
            wealth: Arc::new(RwLock::new(wealth)),
            config,
        })
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn amount(value: &Value) -> String {
        // decimals serialize as strings
        value.as_str().map(str::to_string).unwrap_or_else(|| value.to_string())
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_transaction_flow_keeps_balances() {
        let app = app();
        let (status, account) = send(
            &app,
            "POST",
            "/api/accounts",
            Some(json!({ "name": "Checking", "type": "BANK", "openingBalance": 1000 })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let account_id = account["id"].as_str().unwrap().to_string();

        let (status, _) = send(
            &app,
            "POST",
            "/api/transactions",
            Some(json!({ "type": "INCOME", "amount": 500, "accountId": account_id, "categoryId": "cat_1" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (_, expense) = send(
            &app,
            "POST",
            "/api/transactions",
            Some(json!({ "type": "EXPENSE", "amount": 200, "accountId": account_id })),
        )
        .await;
        let (_, accounts) = send(&app, "GET", "/api/accounts", None).await;
        assert_eq!(amount(&accounts[0]["balance"]), "1300");

        let uri = format!("/api/transactions/{}", expense["id"].as_str().unwrap());
        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, accounts) = send(&app, "GET", "/api/accounts", None).await;
        assert_eq!(amount(&accounts[0]["balance"]), "1500");

        let (_, page) = send(&app, "GET", "/api/transactions?limit=10", None).await;
        assert_eq!(page["totalCount"], 1);
    }

    #[tokio::test]
    async fn test_invalid_transaction_is_rejected() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/api/transactions",
            Some(json!({ "type": "TRANSFER", "amount": 5, "accountId": "a" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_csv_import_and_merge() {
        let app = app();
        let csv = "Date,Type,Amount,Account Name,Category Name,Note\n\
                   2025-01-01,INCOME,100,Cash,Salary,\n\
                   2025-01-02,INCOME,50,cash,Salary,\n";
        let request = Request::builder()
            .method("POST")
            .uri("/api/transactions/import/csv")
            .header("content-type", "text/csv")
            .body(Body::from(csv))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let summary: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(summary["imported"], 2);
        assert_eq!(summary["createdAccounts"].as_array().unwrap().len(), 1);

        let (_, merged) = send(&app, "POST", "/api/accounts/merge-duplicates", None).await;
        assert_eq!(merged["removed"], 0);

        let request = Request::builder()
            .method("POST")
            .uri("/api/transactions/import/xlsx")
            .body(Body::from("binary"))
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_json_import_skips_bad_rows() {
        let app = app();
        let (status, summary) = send(
            &app,
            "POST",
            "/api/transactions/import",
            Some(json!([
                { "date": "2025-01-01", "type": "EXPENSE", "amount": 12, "accountName": "Wallet" },
                { "date": "", "type": "EXPENSE", "amount": 12, "accountName": "Wallet" }
            ])),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(summary["imported"], 1);
        assert_eq!(summary["skipped"][0]["row"], 2);
    }

    #[tokio::test]
    async fn test_restore_validation() {
        let app = app();
        let (status, body) = send(&app, "POST", "/api/state/restore", Some(json!({ "user": {} }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_FORMAT");

        let (status, exported) = send(&app, "GET", "/api/state", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(exported["user"]["currency"], "USD");

        let (status, restored) = send(&app, "POST", "/api/state/restore", Some(exported)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(restored["accounts"], 0);
    }

    #[tokio::test]
    async fn test_trend_and_breakdown_queries() {
        let app = app();
        let (status, trend) = send(&app, "GET", "/api/trend?range=1y", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(trend["granularity"], "quarterly");
        assert_eq!(trend["points"].as_array().unwrap().len(), 4);

        let (status, _) = send(&app, "GET", "/api/trend?range=2w", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, breakdown) = send(&app, "GET", "/api/categories/breakdown?type=income", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(breakdown["kind"], "INCOME");
    }

    #[tokio::test]
    async fn test_goal_progress_and_user() {
        let app = app();
        let (status, goal) = send(
            &app,
            "POST",
            "/api/goals",
            Some(json!({ "name": "Bike", "targetAmount": 800, "deadline": "2099-01-01" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let id = goal["id"].as_str().unwrap();

        let (status, progress) = send(&app, "GET", &format!("/api/goals/{}/progress", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(progress["onTrack"], false);

        let (status, _) = send(&app, "GET", "/api/goals/missing/progress", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, user) = send(&app, "PUT", "/api/user", Some(json!({ "currency": "€" }))).await;
        assert_eq!(user["currency"], "€");
        assert_eq!(user["name"], "User");

        let (status, _) = send(&app, "PUT", "/api/user", Some(json!({ "name": "Ana", "currency": " " }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let (_, user) = send(&app, "GET", "/api/user", None).await;
        assert_eq!(user["name"], "User");
        assert_eq!(user["currency"], "€");
    }
}
