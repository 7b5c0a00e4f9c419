//! Aggregation views recomputed from the ledger on every read

use chrono::NaiveDate;
use rust_decimal::Decimal;

use wealthweb_config::Lookback;
use wealthweb_utils::format_amount;

use crate::models::{Goal, LedgerData};
use crate::reports::{
    CategoryBreakdown, CategoryBreakdownEntry, DashboardSummary, GoalProgress, MonthlySummary,
    TrendPoint, TrendReport,
};
use crate::time::{self, Granularity};
use crate::types::{CategoryType, TransactionType};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Sum of all account balances
pub fn net_worth(data: &LedgerData) -> Decimal {
    data.accounts.iter().map(|a| a.balance).sum()
}

/// Income and expense for the calendar month containing `day`
pub fn monthly_summary(data: &LedgerData, day: NaiveDate) -> MonthlySummary {
    let key = time::month_key(day);
    let mut summary = MonthlySummary {
        month: key.clone(),
        income: Decimal::ZERO,
        expense: Decimal::ZERO,
        net: Decimal::ZERO,
        transaction_count: 0,
    };

    for tx in data.transactions.iter().filter(|t| t.month_key() == key) {
        summary.transaction_count += 1;
        match tx.kind {
            TransactionType::Income => summary.income += tx.amount,
            TransactionType::Expense => summary.expense += tx.amount,
            TransactionType::Transfer => {}
        }
    }
    summary.net = summary.income - summary.expense;
    summary
}

/// Months covered by a lookback, counting the current month
fn span_months(data: &LedgerData, lookback: Lookback, today: NaiveDate) -> u32 {
    match lookback.months() {
        Some(months) => months,
        None => data
            .transactions
            .iter()
            .map(|t| t.date_naive())
            .min()
            .map(|earliest| time::months_between(earliest, today) + 1)
            .map(|months| months.max(1) as u32)
            .unwrap_or(1),
    }
}

/// Income, expense and net worth per time bucket over the lookback window
pub fn trend(data: &LedgerData, lookback: Lookback, today: NaiveDate) -> TrendReport {
    let span = span_months(data, lookback, today);
    let granularity = Granularity::for_span(span);

    let mut points: Vec<TrendPoint> = time::buckets(today, span, granularity)
        .into_iter()
        .map(|bucket| {
            let mut income = Decimal::ZERO;
            let mut expense = Decimal::ZERO;
            for tx in data.transactions.iter().filter(|t| bucket.contains_instant(&t.date)) {
                match tx.kind {
                    TransactionType::Income => income += tx.amount,
                    TransactionType::Expense => expense += tx.amount,
                    TransactionType::Transfer => {}
                }
            }
            TrendPoint {
                label: bucket.label,
                start: bucket.start,
                end: bucket.end,
                income,
                expense,
                net: income - expense,
                net_worth: Decimal::ZERO,
            }
        })
        .collect();

    // walk back from today's net worth, leaving out anything dated after the window
    let window_end = points.last().map(|p| p.end).unwrap_or(today);
    let after_window: Decimal = data
        .transactions
        .iter()
        .filter(|t| t.date_naive() >= window_end)
        .map(|t| match t.kind {
            TransactionType::Income => t.amount,
            TransactionType::Expense => -t.amount,
            TransactionType::Transfer => Decimal::ZERO,
        })
        .sum();
    let mut running = net_worth(data) - after_window;
    for point in points.iter_mut().rev() {
        point.net_worth = running;
        running -= point.net;
    }

    log::debug!(
        target: "wealthweb::analytics",
        "trend {} over {} months: {} {} buckets",
        lookback,
        span,
        points.len(),
        granularity
    );
    TrendReport {
        lookback,
        granularity,
        points,
    }
}

/// Average of (income - expense) over the last `window` calendar months including this one
pub fn average_monthly_savings(data: &LedgerData, today: NaiveDate, window: u32) -> Decimal {
    let window = window.max(1);
    let end = time::add_months(today, 1);
    let start = time::add_months(end, -(window as i32));

    let total: Decimal = data
        .transactions
        .iter()
        .filter(|t| {
            let day = t.date_naive();
            day >= start && day < end
        })
        .map(|t| match t.kind {
            TransactionType::Income => t.amount,
            TransactionType::Expense => -t.amount,
            TransactionType::Transfer => Decimal::ZERO,
        })
        .sum();
    total / Decimal::from(window)
}

/// Progress of one goal given the recent savings rate
pub fn goal_progress(goal: &Goal, today: NaiveDate, average_monthly_savings: Decimal) -> GoalProgress {
    let percentage = if goal.target_amount.is_zero() {
        Decimal::ZERO
    } else {
        (goal.current_amount / goal.target_amount * HUNDRED).min(HUNDRED).round_dp(2)
    };
    let months_left = time::months_between(today, goal.deadline).max(0) as u32;
    let remaining = (goal.target_amount - goal.current_amount).max(Decimal::ZERO);
    let monthly_required = if months_left > 0 {
        (remaining / Decimal::from(months_left)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    GoalProgress {
        goal_id: goal.id.clone(),
        name: goal.name.clone(),
        percentage,
        remaining,
        months_left,
        monthly_required,
        average_monthly_savings: average_monthly_savings.round_dp(2),
        on_track: monthly_required <= average_monthly_savings,
    }
}

/// Current-month totals per category for one side of the ledger, largest first
pub fn category_breakdown(data: &LedgerData, kind: CategoryType, today: NaiveDate) -> CategoryBreakdown {
    let key = time::month_key(today);
    let mut entries: Vec<CategoryBreakdownEntry> = Vec::new();

    for tx in data
        .transactions
        .iter()
        .filter(|t| t.kind.category_type() == Some(kind) && t.month_key() == key)
    {
        let category = tx.category_id.as_deref().and_then(|id| data.category(id));
        let category_id = category.map(|c| c.id.clone());
        match entries.iter_mut().find(|e| e.category_id == category_id) {
            Some(entry) => {
                entry.amount += tx.amount;
                entry.transaction_count += 1;
            }
            None => entries.push(CategoryBreakdownEntry {
                category_id,
                name: category.map_or_else(|| "Uncategorized".to_string(), |c| c.name.clone()),
                icon: category.map(|c| c.icon.clone()).unwrap_or_default(),
                amount: tx.amount,
                percentage: Decimal::ZERO,
                transaction_count: 1,
            }),
        }
    }

    let total: Decimal = entries.iter().map(|e| e.amount).sum();
    if !total.is_zero() {
        for entry in entries.iter_mut() {
            entry.percentage = (entry.amount / total * HUNDRED).round_dp(2);
        }
    }
    entries.sort_by(|a, b| b.amount.cmp(&a.amount));

    CategoryBreakdown {
        kind,
        month: key,
        total,
        entries,
    }
}

/// Header numbers for the dashboard, formatted with the user's currency
pub fn dashboard_summary(data: &LedgerData, today: NaiveDate) -> DashboardSummary {
    let currency = data.user.currency.clone();
    let worth = net_worth(data);
    let month = monthly_summary(data, today);

    DashboardSummary {
        user_name: data.user.name.clone(),
        net_worth_display: format_amount(worth, &currency),
        income_display: format_amount(month.income, &currency),
        expense_display: format_amount(month.expense, &currency),
        currency,
        net_worth: worth,
        month,
        account_count: data.accounts.len(),
        transaction_count: data.transactions.len(),
        recent_transactions: data.transactions.iter().take(5).cloned().collect(),
    }
}
