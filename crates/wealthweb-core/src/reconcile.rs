//! Bulk import reconciliation
//!
//! Turns [`ImportRow`]s into transactions, resolving account and category names
//! case-insensitively and creating the entities that do not exist yet.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use wealthweb_config::ImportConfig;
use wealthweb_import::{parse_import_date, ImportRow};
use wealthweb_utils::{generate_id, name_key};

use crate::models::{Account, Category, LedgerData, Transaction};
use crate::types::{AccountKind, CategoryType, TransactionType};

/// Knobs for one import run
#[derive(Debug, Clone, PartialEq)]
pub struct ImportOptions {
    /// Keep transfers with no destination instead of skipping them
    pub allow_one_sided_transfers: bool,
    pub default_note: String,
    /// Icon for categories created during import
    pub auto_created_icon: String,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self::from(&ImportConfig::default())
    }
}

impl From<&ImportConfig> for ImportOptions {
    fn from(config: &ImportConfig) -> Self {
        Self {
            allow_one_sided_transfers: config.allow_one_sided_transfers,
            default_note: config.default_note.clone(),
            auto_created_icon: config.auto_created_icon.clone(),
        }
    }
}

/// A row left out of the batch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedRow {
    /// 1-based position in the submitted rows
    pub row: usize,
    pub reason: String,
}

/// Outcome of a bulk import
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub imported: usize,
    pub created_accounts: Vec<String>,
    pub created_categories: Vec<String>,
    pub skipped: Vec<SkippedRow>,
}

/// Name-to-id indexes that grow as the batch creates entities
struct Resolver {
    accounts: HashMap<String, String>,
    categories: HashMap<String, String>,
}

impl Resolver {
    fn new(data: &LedgerData) -> Self {
        // first entity wins when names already collide
        let mut accounts = HashMap::new();
        for account in &data.accounts {
            accounts.entry(name_key(&account.name)).or_insert_with(|| account.id.clone());
        }
        let mut categories = HashMap::new();
        for category in &data.categories {
            categories.entry(name_key(&category.name)).or_insert_with(|| category.id.clone());
        }
        Self { accounts, categories }
    }

    fn account(&mut self, data: &mut LedgerData, name: &str, summary: &mut ImportSummary) -> String {
        let key = name_key(name);
        if let Some(id) = self.accounts.get(&key) {
            return id.clone();
        }

        let account = Account {
            id: generate_id(),
            name: name.trim().to_string(),
            kind: AccountKind::Cash,
            asset_class: None,
            balance: Decimal::ZERO,
            opening_balance: Decimal::ZERO,
            currency: Some(data.user.currency.clone()),
            is_auto_created: true,
        };
        log::debug!(target: "wealthweb::import", "auto-creating account '{}'", account.name);
        let id = account.id.clone();
        self.accounts.insert(key, id.clone());
        summary.created_accounts.push(id.clone());
        data.accounts.push(account);
        id
    }

    fn category(
        &mut self,
        data: &mut LedgerData,
        name: &str,
        kind: CategoryType,
        icon: &str,
        summary: &mut ImportSummary,
    ) -> String {
        let key = name_key(name);
        if let Some(id) = self.categories.get(&key) {
            return id.clone();
        }

        let category = Category {
            id: generate_id(),
            name: name.trim().to_string(),
            kind,
            icon: icon.to_string(),
            is_auto_created: true,
        };
        log::debug!(target: "wealthweb::import", "auto-creating category '{}'", category.name);
        let id = category.id.clone();
        self.categories.insert(key, id.clone());
        summary.created_categories.push(id.clone());
        data.categories.push(category);
        id
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl LedgerData {
    /// Reconcile a batch of rows into the ledger and recompute balances
    ///
    /// Unusable rows are skipped and listed in the summary, never raised.
    /// Imported transactions go ahead of existing ones, in row order.
    pub fn import_rows(&mut self, rows: &[ImportRow], options: &ImportOptions) -> ImportSummary {
        let mut summary = ImportSummary::default();
        let mut resolver = Resolver::new(self);
        let mut batch: Vec<Transaction> = Vec::with_capacity(rows.len());

        for (index, row) in rows.iter().enumerate() {
            let position = index + 1;
            let mut skip = |reason: String| {
                log::debug!(target: "wealthweb::import", "skipping row {}: {}", position, reason);
                summary.skipped.push(SkippedRow { row: position, reason });
            };

            if !row.is_complete() {
                skip("missing date or amount".to_string());
                continue;
            }
            let amount = row.amount.unwrap_or_default();
            if amount <= Decimal::ZERO {
                skip(format!("amount must be positive, got {}", amount));
                continue;
            }
            let kind = match row.kind.parse::<TransactionType>() {
                Ok(kind) => kind,
                Err(e) => {
                    skip(e);
                    continue;
                }
            };
            let Some(date) = parse_import_date(&row.date) else {
                skip(format!("unparseable date '{}'", row.date));
                continue;
            };
            if row.account_name.trim().is_empty() {
                skip("missing account name".to_string());
                continue;
            }
            let to_account_name = non_empty(&row.to_account_name);
            if kind == TransactionType::Transfer
                && to_account_name.is_none()
                && !options.allow_one_sided_transfers
            {
                skip("transfer without a destination account".to_string());
                continue;
            }
            if kind == TransactionType::Transfer
                && to_account_name.map_or(false, |to| name_key(to) == name_key(&row.account_name))
            {
                skip("transfer source and destination are the same account".to_string());
                continue;
            }

            let account_id = resolver.account(self, &row.account_name, &mut summary);
            let to_account_id = match (kind, to_account_name) {
                (TransactionType::Transfer, Some(name)) => {
                    Some(resolver.account(self, name, &mut summary))
                }
                _ => None,
            };
            let category_id = match (kind.category_type(), non_empty(&row.category_name)) {
                (Some(category_kind), Some(name)) => Some(resolver.category(
                    self,
                    name,
                    category_kind,
                    &options.auto_created_icon,
                    &mut summary,
                )),
                _ => None,
            };

            batch.push(Transaction {
                id: generate_id(),
                date,
                kind,
                amount,
                account_id,
                to_account_id,
                category_id,
                note: non_empty(&row.note)
                    .map(str::to_string)
                    .unwrap_or_else(|| options.default_note.clone()),
            });
        }

        summary.imported = batch.len();
        if !batch.is_empty() {
            batch.append(&mut self.transactions);
            self.transactions = batch;
        }
        self.recalculate_all_balances();

        log::info!(
            target: "wealthweb::import",
            "imported {} transactions ({} skipped, {} accounts and {} categories created)",
            summary.imported,
            summary.skipped.len(),
            summary.created_accounts.len(),
            summary.created_categories.len()
        );
        summary
    }
}
