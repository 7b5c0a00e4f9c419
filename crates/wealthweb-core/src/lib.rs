//! Core ledger processing and business logic
//!
//! [`LedgerData`] is the whole application state. The balance engine, import
//! reconciler, duplicate merge and entity management are implemented on it as
//! plain synchronous methods; [`Wealth`] wraps it with functional updates and
//! persistence.

pub mod analytics;
pub mod backup;
pub mod balance;
pub mod entities;
pub mod error;
pub mod merge;
pub mod models;
pub mod reconcile;
pub mod reports;
pub mod storage;
pub mod time;
pub mod types;

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;

use wealthweb_config::{Config, Lookback};
use wealthweb_import::{generate_template, ImportRow, ImportTemplate, RowParser};

pub use balance::{apply_effect, BalanceDrift};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorDetails, ErrorSeverity};
pub use models::{
    Account, AccountPatch, AssetClass, Category, DayGroup, Goal, GoalPatch, LedgerData, NewAccount,
    NewCategory, NewGoal, NewTransaction, Transaction, TransactionPatch, UserProfile,
};
pub use reconcile::{ImportOptions, ImportSummary, SkippedRow};
pub use reports::{
    CategoryBreakdown, CategoryBreakdownEntry, DashboardSummary, GoalProgress, MonthlySummary,
    TransactionsResponse, TrendPoint, TrendReport,
};
pub use storage::{JsonFileStorage, MemoryStorage, StateStorage, StorageRef};
pub use types::{AccountKind, CategoryType, EffectSign, TransactionType};

/// Application context: current state plus the storage it is saved to
///
/// Every mutation runs against a clone of the state. The clone replaces the
/// current state only when the operation succeeds, and is then saved.
pub struct Wealth {
    state: Arc<LedgerData>,
    storage: StorageRef,
    import_options: ImportOptions,
    savings_window_months: u32,
    pretty_export: bool,
}

impl Wealth {
    /// Load the saved state, seeding and saving defaults when there is none
    pub fn open(config: &Config, storage: StorageRef) -> CoreResult<Self> {
        let state = match storage.load()? {
            Some(data) => {
                log::info!(
                    target: "wealthweb::store",
                    "loaded {} accounts and {} transactions from {}",
                    data.accounts.len(),
                    data.transactions.len(),
                    storage.describe()
                );
                data
            }
            None => {
                let data = LedgerData::seeded(UserProfile {
                    name: config.user.name.clone(),
                    currency: config.user.currency.clone(),
                });
                storage.save(&data)?;
                log::info!(target: "wealthweb::store", "seeded new state at {}", storage.describe());
                data
            }
        };

        let wealth = Self {
            state: Arc::new(state),
            storage,
            import_options: ImportOptions::from(&config.import),
            savings_window_months: config.analytics.savings_window_months,
            pretty_export: config.storage.pretty,
        };
        let drift = wealth.state.balance_drift();
        if !drift.is_empty() {
            log::warn!(
                target: "wealthweb::store",
                "{} account balances disagree with the transaction log; run a recalculation",
                drift.len()
            );
        }
        Ok(wealth)
    }

    /// Context over [`MemoryStorage`]
    pub fn in_memory(config: &Config) -> CoreResult<Self> {
        Self::open(config, Arc::new(MemoryStorage::new()))
    }

    /// Current immutable state
    pub fn snapshot(&self) -> Arc<LedgerData> {
        Arc::clone(&self.state)
    }

    /// Run `op` on a copy of the state and commit it on success
    pub fn update<T>(
        &mut self,
        operation: &str,
        op: impl FnOnce(&mut LedgerData) -> CoreResult<T>,
    ) -> CoreResult<T> {
        let mut next = (*self.state).clone();
        let result = op(&mut next)?;
        self.state = Arc::new(next);

        // the in-memory state stays committed when the write fails
        match self.storage.save(&self.state) {
            Ok(()) => log::debug!(target: "wealthweb::store", "{}: state saved", operation),
            Err(e) => log::error!(
                target: "wealthweb::store",
                "{}: failed to save state to {}: {}",
                operation,
                self.storage.describe(),
                e
            ),
        }
        Ok(result)
    }

    fn today() -> NaiveDate {
        Utc::now().date_naive()
    }

    // ==================== Transactions ====================

    pub fn add_transaction(&mut self, new: NewTransaction) -> CoreResult<Transaction> {
        self.update("add_transaction", |data| data.add_transaction(new))
    }

    /// `Ok(None)` when the id is unknown
    pub fn update_transaction(
        &mut self,
        id: &str,
        patch: &TransactionPatch,
    ) -> CoreResult<Option<Transaction>> {
        if self.state.transaction(id).is_none() {
            return Ok(None);
        }
        self.update("update_transaction", |data| data.update_transaction(id, patch))
    }

    /// `None` when the id is unknown
    pub fn delete_transaction(&mut self, id: &str) -> CoreResult<Option<Transaction>> {
        if self.state.transaction(id).is_none() {
            return Ok(None);
        }
        self.update("delete_transaction", |data| Ok(data.delete_transaction(id)))
    }

    /// Recompute every balance; returns the drift that was corrected
    pub fn recalculate_all_balances(&mut self) -> CoreResult<Vec<BalanceDrift>> {
        self.update("recalculate", |data| {
            let drift = data.balance_drift();
            for entry in &drift {
                log::warn!(
                    target: "wealthweb::balance",
                    "account '{}' drifted by {}",
                    entry.name,
                    entry.difference
                );
            }
            data.recalculate_all_balances();
            Ok(drift)
        })
    }

    // ==================== Import ====================

    pub fn import_rows(&mut self, rows: &[ImportRow]) -> CoreResult<ImportSummary> {
        let options = self.import_options.clone();
        self.update("import", |data| Ok(data.import_rows(rows, &options)))
    }

    /// Parse a CSV or JSON payload and import its rows
    ///
    /// A payload that cannot be parsed leaves the state untouched.
    pub fn import_payload(&mut self, parser: &dyn RowParser, content: &str) -> CoreResult<ImportSummary> {
        let rows = parser.parse(content)?;
        log::info!(
            target: "wealthweb::import",
            "received {} {} rows",
            rows.len(),
            parser.format()
        );
        self.import_rows(&rows)
    }

    pub fn import_template(&self) -> CoreResult<ImportTemplate> {
        Ok(generate_template(
            &self.state.account_names(),
            &self.state.category_names(),
        )?)
    }

    pub fn merge_duplicate_accounts(&mut self) -> CoreResult<usize> {
        self.update("merge_duplicates", |data| Ok(data.merge_duplicate_accounts()))
    }

    // ==================== Entities ====================

    pub fn add_account(&mut self, new: NewAccount) -> CoreResult<Account> {
        self.update("add_account", |data| data.add_account(new))
    }

    pub fn update_account(&mut self, id: &str, patch: AccountPatch) -> CoreResult<Account> {
        self.update("update_account", |data| data.update_account(id, patch))
    }

    /// Returns the account and the transactions removed with it
    pub fn delete_account(&mut self, id: &str) -> CoreResult<(Account, Vec<Transaction>)> {
        self.update("delete_account", |data| data.delete_account(id))
    }

    pub fn add_category(&mut self, new: NewCategory) -> CoreResult<Category> {
        self.update("add_category", |data| data.add_category(new))
    }

    pub fn delete_category(&mut self, id: &str) -> CoreResult<Category> {
        self.update("delete_category", |data| data.delete_category(id))
    }

    pub fn add_asset_class(&mut self, name: &str) -> CoreResult<AssetClass> {
        self.update("add_asset_class", |data| data.add_asset_class(name))
    }

    pub fn delete_asset_class(&mut self, id: &str) -> CoreResult<Option<AssetClass>> {
        if !self.state.asset_classes.iter().any(|c| c.id == id) {
            return Ok(None);
        }
        self.update("delete_asset_class", |data| Ok(data.delete_asset_class(id)))
    }

    pub fn add_goal(&mut self, new: NewGoal) -> CoreResult<Goal> {
        self.update("add_goal", |data| data.add_goal(new))
    }

    pub fn update_goal(&mut self, id: &str, patch: GoalPatch) -> CoreResult<Goal> {
        self.update("update_goal", |data| data.update_goal(id, patch))
    }

    pub fn delete_goal(&mut self, id: &str) -> CoreResult<Goal> {
        self.update("delete_goal", |data| data.delete_goal(id))
    }

    pub fn contribute_to_goal(&mut self, id: &str, amount: Decimal) -> CoreResult<Goal> {
        self.update("contribute_to_goal", |data| data.contribute_to_goal(id, amount))
    }

    pub fn update_currency(&mut self, symbol: &str) -> CoreResult<()> {
        self.update("update_currency", |data| data.update_currency(symbol))
    }

    pub fn update_user_name(&mut self, name: &str) -> CoreResult<()> {
        self.update("update_user_name", |data| data.update_user_name(name))
    }

    pub fn update_profile(&mut self, name: Option<&str>, currency: Option<&str>) -> CoreResult<()> {
        self.update("update_profile", |data| data.update_profile(name, currency))
    }

    // ==================== Backup ====================

    pub fn export_json(&self) -> CoreResult<String> {
        backup::export_json(&self.state, self.pretty_export)
    }

    /// Replace the whole state with a backup document
    pub fn restore_backup(&mut self, value: serde_json::Value) -> CoreResult<()> {
        let restored = backup::parse_backup(value)?;
        self.update("restore_backup", |data| {
            *data = restored;
            Ok(())
        })?;
        log::info!(
            target: "wealthweb::store",
            "restored backup with {} accounts and {} transactions",
            self.state.accounts.len(),
            self.state.transactions.len()
        );
        Ok(())
    }

    // ==================== Views ====================

    pub fn net_worth(&self) -> Decimal {
        analytics::net_worth(&self.state)
    }

    pub fn monthly_summary(&self) -> MonthlySummary {
        analytics::monthly_summary(&self.state, Self::today())
    }

    pub fn dashboard_summary(&self) -> DashboardSummary {
        analytics::dashboard_summary(&self.state, Self::today())
    }

    pub fn trend(&self, lookback: Lookback) -> TrendReport {
        analytics::trend(&self.state, lookback, Self::today())
    }

    pub fn category_breakdown(&self, kind: CategoryType) -> CategoryBreakdown {
        analytics::category_breakdown(&self.state, kind, Self::today())
    }

    pub fn goal_progress(&self, id: &str) -> CoreResult<GoalProgress> {
        self.goal_progress_at(id, Self::today())
    }

    pub fn goal_progress_at(&self, id: &str, today: NaiveDate) -> CoreResult<GoalProgress> {
        let goal = self
            .state
            .goal(id)
            .ok_or_else(|| CoreError::GoalNotFound { id: id.to_string() })?;
        let savings = analytics::average_monthly_savings(&self.state, today, self.savings_window_months);
        Ok(analytics::goal_progress(goal, today, savings))
    }

    pub fn all_goal_progress(&self) -> Vec<GoalProgress> {
        let today = Self::today();
        let savings = analytics::average_monthly_savings(&self.state, today, self.savings_window_months);
        self.state
            .goals
            .iter()
            .map(|goal| analytics::goal_progress(goal, today, savings))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use wealthweb_import::{DefaultRowParser, ImportFormat};

    fn wealth() -> (Wealth, Arc<MemoryStorage>) {
        let storage = Arc::new(MemoryStorage::new());
        let wealth = Wealth::open(&Config::default(), storage.clone()).unwrap();
        (wealth, storage)
    }

    fn income(account_id: &str, amount: i64) -> NewTransaction {
        NewTransaction {
            date: Some(Utc.with_ymd_and_hms(2025, 1, 5, 0, 0, 0).unwrap()),
            kind: TransactionType::Income,
            amount: Decimal::from(amount),
            account_id: account_id.to_string(),
            to_account_id: None,
            category_id: Some("cat_1".to_string()),
            note: String::new(),
        }
    }

    #[test]
    fn test_open_seeds_and_saves() {
        let (wealth, storage) = wealth();
        assert_eq!(wealth.snapshot().categories.len(), 6);
        assert!(storage.document().is_some());
    }

    #[test]
    fn test_open_uses_configured_profile() {
        let mut config = Config::default();
        config.user.name = "Rin".to_string();
        config.user.currency = "¥".to_string();
        let wealth = Wealth::in_memory(&config).unwrap();
        assert_eq!(wealth.snapshot().user.currency, "¥");
        assert_eq!(wealth.snapshot().user.name, "Rin");
    }

    #[test]
    fn test_mutations_persist() {
        let (mut wealth, storage) = wealth();
        let account = wealth
            .add_account(NewAccount {
                name: "Checking".to_string(),
                opening_balance: Decimal::from(1000),
                ..Default::default()
            })
            .unwrap();
        wealth.add_transaction(income(&account.id, 500)).unwrap();

        let saved = storage.load().unwrap().unwrap();
        assert_eq!(saved, *wealth.snapshot());
        assert_eq!(saved.account(&account.id).unwrap().balance, Decimal::from(1500));
    }

    #[test]
    fn test_failed_mutation_keeps_snapshot() {
        let (mut wealth, _) = wealth();
        let before = wealth.snapshot();
        assert!(wealth.add_transaction(income("a", 0)).is_err());
        assert!(Arc::ptr_eq(&before, &wealth.snapshot()));
    }

    #[test]
    fn test_snapshots_are_immutable() {
        let (mut wealth, _) = wealth();
        let before = wealth.snapshot();
        wealth.add_asset_class("Crypto").unwrap();
        assert_eq!(before.asset_classes.len(), 4);
        assert_eq!(wealth.snapshot().asset_classes.len(), 5);
    }

    #[test]
    fn test_unknown_ids_are_noops() {
        let (mut wealth, _) = wealth();
        let before = wealth.snapshot();
        assert!(wealth.delete_transaction("nope").unwrap().is_none());
        assert!(wealth
            .update_transaction("nope", &TransactionPatch::default())
            .unwrap()
            .is_none());
        assert!(Arc::ptr_eq(&before, &wealth.snapshot()));
    }

    #[test]
    fn test_import_payload_and_template() {
        let (mut wealth, _) = wealth();
        let csv = "Date,Type,Amount,Account Name,Category Name,Note\n\
                   2025-01-01,INCOME,100,Cash,Salary,\n\
                   2025-01-02,INCOME,50,cash,Salary,\n";
        let summary = wealth
            .import_payload(&DefaultRowParser::new(ImportFormat::Csv), csv)
            .unwrap();
        assert_eq!(summary.imported, 2);
        assert_eq!(wealth.snapshot().accounts.len(), 1);
        assert_eq!(wealth.net_worth(), Decimal::from(150));

        let template = wealth.import_template().unwrap();
        assert!(template.transactions_csv.contains(",Cash,,Salary,"));

        let before = wealth.snapshot();
        assert!(wealth
            .import_payload(&DefaultRowParser::new(ImportFormat::Json), "{oops")
            .is_err());
        assert!(Arc::ptr_eq(&before, &wealth.snapshot()));
    }

    #[test]
    fn test_export_restore_round_trip() {
        let (mut wealth, _) = wealth();
        let account = wealth
            .add_account(NewAccount {
                name: "Bank".to_string(),
                ..Default::default()
            })
            .unwrap();
        wealth.add_transaction(income(&account.id, 75)).unwrap();
        let exported = wealth.export_json().unwrap();
        let original = wealth.snapshot();

        let (mut other, _) = self::wealth();
        other
            .restore_backup(serde_json::from_str(&exported).unwrap())
            .unwrap();
        assert_eq!(*other.snapshot(), *original);
    }

    #[test]
    fn test_restore_rejects_invalid_backup() {
        let (mut wealth, _) = wealth();
        let before = wealth.snapshot();
        let err = wealth
            .restore_backup(serde_json::json!({ "accounts": [] }))
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidFormat);
        assert!(Arc::ptr_eq(&before, &wealth.snapshot()));
    }

    #[test]
    fn test_recalculate_reports_drift() {
        let (mut wealth, _) = wealth();
        let account = wealth
            .add_account(NewAccount {
                name: "Bank".to_string(),
                opening_balance: Decimal::from(10),
                ..Default::default()
            })
            .unwrap();
        wealth
            .update("corrupt", |data| {
                data.accounts[0].balance = Decimal::from(99);
                Ok(())
            })
            .unwrap();

        let drift = wealth.recalculate_all_balances().unwrap();
        assert_eq!(drift.len(), 1);
        assert_eq!(drift[0].account_id, account.id);
        assert_eq!(wealth.net_worth(), Decimal::from(10));
        assert!(wealth.recalculate_all_balances().unwrap().is_empty());
    }

    #[test]
    fn test_goal_progress_uses_savings_window() {
        let (mut wealth, _) = wealth();
        let account = wealth
            .add_account(NewAccount {
                name: "Bank".to_string(),
                ..Default::default()
            })
            .unwrap();
        wealth.add_transaction(income(&account.id, 3000)).unwrap();
        let goal = wealth
            .add_goal(NewGoal {
                name: "Trip".to_string(),
                target_amount: Decimal::from(12000),
                current_amount: Decimal::ZERO,
                deadline: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
                icon: String::new(),
            })
            .unwrap();

        let progress = wealth
            .goal_progress_at(&goal.id, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())
            .unwrap();
        assert_eq!(progress.average_monthly_savings, Decimal::from(1000));
        assert_eq!(progress.monthly_required, Decimal::from(1000));
        assert!(progress.on_track);
        assert!(matches!(
            wealth.goal_progress("missing"),
            Err(CoreError::GoalNotFound { .. })
        ));
    }
}
