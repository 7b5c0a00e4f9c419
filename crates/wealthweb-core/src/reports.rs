//! Report structures for API responses

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use wealthweb_config::Lookback;

use crate::models::Transaction;
use crate::time::Granularity;
use crate::types::CategoryType;

/// Income and expense totals for one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    /// `YYYY-MM`
    pub month: String,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    pub transaction_count: usize,
}

/// One trend bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendPoint {
    pub label: String,
    pub start: NaiveDate,
    /// Exclusive
    pub end: NaiveDate,
    pub income: Decimal,
    pub expense: Decimal,
    pub net: Decimal,
    /// Net worth at the end of the bucket
    pub net_worth: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendReport {
    pub lookback: Lookback,
    pub granularity: Granularity,
    pub points: Vec<TrendPoint>,
}

/// Progress of a savings goal against the recent savings rate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub goal_id: String,
    pub name: String,
    /// 0 to 100, two decimals
    pub percentage: Decimal,
    pub remaining: Decimal,
    pub months_left: u32,
    pub monthly_required: Decimal,
    pub average_monthly_savings: Decimal,
    pub on_track: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdownEntry {
    /// `None` for transactions without a known category
    pub category_id: Option<String>,
    pub name: String,
    pub icon: String,
    pub amount: Decimal,
    pub percentage: Decimal,
    pub transaction_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub kind: CategoryType,
    pub month: String,
    pub total: Decimal,
    pub entries: Vec<CategoryBreakdownEntry>,
}

/// Dashboard header numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub user_name: String,
    pub currency: String,
    pub net_worth: Decimal,
    pub net_worth_display: String,
    pub month: MonthlySummary,
    pub income_display: String,
    pub expense_display: String,
    pub account_count: usize,
    pub transaction_count: usize,
    pub recent_transactions: Vec<Transaction>,
}

/// Paged transaction listing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsResponse {
    pub transactions: Vec<Transaction>,
    pub total_count: usize,
    pub offset: usize,
    pub limit: Option<usize>,
}
