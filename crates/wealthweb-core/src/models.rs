//! Core data models for the ledger

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{AccountKind, CategoryType, TransactionType};

/// Account information
///
/// `balance` always equals `opening_balance` plus the signed effects of every
/// stored transaction that references this account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountKind,
    /// Asset class name for ASSET accounts
    #[serde(default, alias = "subtype", skip_serializing_if = "Option::is_none")]
    pub asset_class: Option<String>,
    #[serde(default)]
    pub balance: Decimal,
    #[serde(default)]
    pub opening_balance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(default)]
    pub is_auto_created: bool,
}

/// Transaction category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
    #[serde(default)]
    pub icon: String,
    #[serde(default)]
    pub is_auto_created: bool,
}

/// Asset class tag, referenced by name from `Account::asset_class`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetClass {
    pub id: String,
    pub name: String,
}

/// One ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    pub account_id: String,
    /// Destination for transfers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(default)]
    pub note: String,
}

impl Transaction {
    /// Signed balance deltas this transaction applies, one per affected account
    pub fn effects(&self) -> Vec<(&str, Decimal)> {
        match self.kind {
            TransactionType::Income => vec![(self.account_id.as_str(), self.amount)],
            TransactionType::Expense => vec![(self.account_id.as_str(), -self.amount)],
            TransactionType::Transfer => {
                let mut effects = vec![(self.account_id.as_str(), -self.amount)];
                if let Some(ref to) = self.to_account_id {
                    effects.push((to.as_str(), self.amount));
                }
                effects
            }
        }
    }

    /// Check if transaction touches an account on either side
    pub fn involves_account(&self, account_id: &str) -> bool {
        self.account_id == account_id || self.to_account_id.as_deref() == Some(account_id)
    }

    /// `YYYY-MM` of the UTC date
    pub fn month_key(&self) -> String {
        self.date.format("%Y-%m").to_string()
    }

    pub fn date_naive(&self) -> NaiveDate {
        self.date.date_naive()
    }

    /// Drop the fields that do not belong to this transaction type
    pub(crate) fn normalize(&mut self) {
        if self.kind == TransactionType::Transfer {
            self.category_id = None;
        } else {
            self.to_account_id = None;
        }
        if self.category_id.as_deref() == Some("") {
            self.category_id = None;
        }
        if self.to_account_id.as_deref() == Some("") {
            self.to_account_id = None;
        }
    }
}

/// Savings goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub name: String,
    pub target_amount: Decimal,
    #[serde(default)]
    pub current_amount: Decimal,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub icon: String,
}

/// User profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub name: String,
    /// Currency symbol or code shown next to amounts
    pub currency: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: "User".to_string(),
            currency: "USD".to_string(),
        }
    }
}

/// The whole persisted state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerData {
    pub user: UserProfile,
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub asset_classes: Vec<AssetClass>,
    /// Most recently inserted first
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

impl Default for LedgerData {
    fn default() -> Self {
        Self::seeded(UserProfile::default())
    }
}

impl LedgerData {
    /// Fresh state with the stock categories and asset classes
    pub fn seeded(user: UserProfile) -> Self {
        let category = |id: &str, name: &str, kind: CategoryType, icon: &str| Category {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            icon: icon.to_string(),
            is_auto_created: false,
        };
        let asset_class = |id: &str, name: &str| AssetClass {
            id: id.to_string(),
            name: name.to_string(),
        };

        Self {
            user,
            accounts: Vec::new(),
            categories: vec![
                category("cat_1", "Salary", CategoryType::Income, "💰"),
                category("cat_2", "Investments", CategoryType::Income, "📈"),
                category("cat_3", "Food", CategoryType::Expense, "🍔"),
                category("cat_4", "Transport", CategoryType::Expense, "🚌"),
                category("cat_5", "Utilities", CategoryType::Expense, "💡"),
                category("cat_6", "Shopping", CategoryType::Expense, "🛍️"),
            ],
            asset_classes: vec![
                asset_class("a1", "Shares"),
                asset_class("a2", "Gold"),
                asset_class("a3", "Fixed Deposit"),
                asset_class("a4", "Real Estate"),
            ],
            transactions: Vec::new(),
            goals: Vec::new(),
        }
    }

    // ==================== Lookups ====================

    pub fn account(&self, id: &str) -> Option<&Account> {
        self.accounts.iter().find(|a| a.id == id)
    }

    pub fn category(&self, id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn goal(&self, id: &str) -> Option<&Goal> {
        self.goals.iter().find(|g| g.id == id)
    }

    pub fn transaction(&self, id: &str) -> Option<&Transaction> {
        self.transactions.iter().find(|t| t.id == id)
    }

    /// Case-insensitive exact name match
    pub fn account_by_name(&self, name: &str) -> Option<&Account> {
        let key = wealthweb_utils::name_key(name);
        self.accounts
            .iter()
            .find(|a| wealthweb_utils::name_key(&a.name) == key)
    }

    /// Case-insensitive exact name match
    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        let key = wealthweb_utils::name_key(name);
        self.categories
            .iter()
            .find(|c| wealthweb_utils::name_key(&c.name) == key)
    }

    pub fn categories_by_type(&self, kind: CategoryType) -> Vec<&Category> {
        self.categories.iter().filter(|c| c.kind == kind).collect()
    }

    /// Page through transactions in stored (most recently inserted first) order
    pub fn list_transactions(&self, limit: Option<usize>, offset: usize) -> Vec<&Transaction> {
        let iter = self.transactions.iter().skip(offset);
        match limit {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        }
    }

    /// Transactions grouped by calendar day, newest day first
    pub fn history(&self) -> Vec<DayGroup> {
        let mut sorted: Vec<&Transaction> = self.transactions.iter().collect();
        sorted.sort_by(|a, b| b.date.cmp(&a.date));

        let mut groups: Vec<DayGroup> = Vec::new();
        for tx in sorted {
            let day = tx.date_naive();
            match groups.last_mut() {
                Some(group) if group.date == day => group.transactions.push(tx.clone()),
                _ => groups.push(DayGroup {
                    date: day,
                    transactions: vec![tx.clone()],
                }),
            }
        }
        groups
    }

    pub fn account_names(&self) -> Vec<String> {
        self.accounts.iter().map(|a| a.name.clone()).collect()
    }

    pub fn category_names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }
}

/// Transactions sharing one calendar day
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayGroup {
    pub date: NaiveDate,
    pub transactions: Vec<Transaction>,
}

// ==================== Inputs ====================

/// Input for a new transaction; the ledger assigns the id
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransaction {
    /// Defaults to now
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub amount: Decimal,
    pub account_id: String,
    #[serde(default)]
    pub to_account_id: Option<String>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub note: String,
}

/// Partial edit of a transaction; absent fields keep their stored value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPatch {
    pub date: Option<DateTime<Utc>>,
    #[serde(rename = "type")]
    pub kind: Option<TransactionType>,
    pub amount: Option<Decimal>,
    pub account_id: Option<String>,
    pub to_account_id: Option<String>,
    pub category_id: Option<String>,
    pub note: Option<String>,
}

impl TransactionPatch {
    /// Merge into a copy of `tx`; the id never changes
    pub fn apply_to(&self, tx: &Transaction) -> Transaction {
        let mut next = tx.clone();
        if let Some(date) = self.date {
            next.date = date;
        }
        if let Some(kind) = self.kind {
            next.kind = kind;
        }
        if let Some(amount) = self.amount {
            next.amount = amount;
        }
        if let Some(ref account_id) = self.account_id {
            next.account_id = account_id.clone();
        }
        if let Some(ref to) = self.to_account_id {
            next.to_account_id = Some(to.clone());
        }
        if let Some(ref category) = self.category_id {
            next.category_id = Some(category.clone());
        }
        if let Some(ref note) = self.note {
            next.note = note.clone();
        }
        next.normalize();
        next
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAccount {
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: AccountKind,
    #[serde(default, alias = "subtype")]
    pub asset_class: Option<String>,
    #[serde(default)]
    pub opening_balance: Decimal,
    #[serde(default)]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPatch {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<AccountKind>,
    #[serde(alias = "subtype")]
    pub asset_class: Option<String>,
    pub opening_balance: Option<Decimal>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCategory {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CategoryType,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub name: String,
    pub target_amount: Decimal,
    #[serde(default)]
    pub current_amount: Decimal,
    pub deadline: NaiveDate,
    #[serde(default)]
    pub icon: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPatch {
    pub name: Option<String>,
    pub target_amount: Option<Decimal>,
    pub current_amount: Option<Decimal>,
    pub deadline: Option<NaiveDate>,
    pub icon: Option<String>,
}
