//! Duplicate account merge

use std::collections::HashMap;

use wealthweb_utils::name_key;

use crate::models::LedgerData;
use crate::types::TransactionType;

impl LedgerData {
    /// Collapse accounts sharing a case-insensitive name into the first one
    ///
    /// Balances and opening balances are summed into the kept account and
    /// transactions are re-pointed at it. Returns how many accounts were removed.
    pub fn merge_duplicate_accounts(&mut self) -> usize {
        let mut kept: HashMap<String, usize> = HashMap::new();
        let mut remap: HashMap<String, String> = HashMap::new();

        for index in 0..self.accounts.len() {
            let key = name_key(&self.accounts[index].name);
            match kept.get(&key) {
                Some(&target) => {
                    let (balance, opening) = (
                        self.accounts[index].balance,
                        self.accounts[index].opening_balance,
                    );
                    let target_id = self.accounts[target].id.clone();
                    self.accounts[target].balance += balance;
                    self.accounts[target].opening_balance += opening;
                    remap.insert(self.accounts[index].id.clone(), target_id);
                }
                None => {
                    kept.insert(key, index);
                }
            }
        }

        if remap.is_empty() {
            return 0;
        }

        self.accounts.retain(|a| !remap.contains_key(&a.id));
        for tx in self.transactions.iter_mut() {
            if let Some(target) = remap.get(&tx.account_id) {
                tx.account_id = target.clone();
            }
            if let Some(target) = tx.to_account_id.as_ref().and_then(|to| remap.get(to)) {
                tx.to_account_id = Some(target.clone());
            }
        }

        // a transfer between two merged duplicates nets to zero on the kept account
        let before = self.transactions.len();
        self.transactions.retain(|tx| {
            !(tx.kind == TransactionType::Transfer && tx.to_account_id.as_deref() == Some(tx.account_id.as_str()))
        });
        let dropped = before - self.transactions.len();
        if dropped > 0 {
            log::info!(target: "wealthweb::merge", "dropped {} transfers between merged duplicates", dropped);
        }

        log::info!(target: "wealthweb::merge", "merged {} duplicate accounts", remap.len());
        remap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, NewTransaction};
    use crate::types::{AccountKind, TransactionType};
    use rust_decimal::Decimal;

    fn account(id: &str, name: &str, opening: i64) -> Account {
        Account {
            id: id.to_string(),
            name: name.to_string(),
            kind: AccountKind::Cash,
            asset_class: None,
            balance: Decimal::from(opening),
            opening_balance: Decimal::from(opening),
            currency: None,
            is_auto_created: false,
        }
    }

    fn add(data: &mut LedgerData, kind: TransactionType, amount: i64, from: &str, to: Option<&str>) {
        data.add_transaction(NewTransaction {
            date: None,
            kind,
            amount: Decimal::from(amount),
            account_id: from.to_string(),
            to_account_id: to.map(str::to_string),
            category_id: None,
            note: String::new(),
        })
        .unwrap();
    }

    #[test]
    fn test_merge_sums_and_remaps() {
        let mut data = LedgerData::default();
        data.accounts = vec![
            account("1", "Wallet", 10),
            account("2", "Bank", 100),
            account("3", "wallet", 5),
            account("4", " WALLET", 0),
        ];
        add(&mut data, TransactionType::Income, 20, "3", None);
        add(&mut data, TransactionType::Transfer, 30, "2", Some("4"));
        let count = data.transactions.len();

        let removed = data.merge_duplicate_accounts();
        assert_eq!(removed, 2);
        assert_eq!(data.accounts.len(), 2);
        assert_eq!(data.transactions.len(), count);

        let wallet = data.account("1").unwrap();
        assert_eq!(wallet.balance, Decimal::from(65));
        assert_eq!(wallet.opening_balance, Decimal::from(15));
        assert!(data.transactions.iter().all(|t| t.account_id != "3"));
        assert_eq!(data.transactions[0].to_account_id.as_deref(), Some("1"));

        // recompute agrees with the merged balances
        assert!(data.balance_drift().is_empty());
    }

    #[test]
    fn test_transfer_between_duplicates_is_dropped() {
        let mut data = LedgerData::default();
        data.accounts = vec![account("1", "Bank", 100), account("2", "BANK", 0)];
        add(&mut data, TransactionType::Transfer, 40, "1", Some("2"));
        add(&mut data, TransactionType::Expense, 10, "2", None);

        assert_eq!(data.merge_duplicate_accounts(), 1);
        assert_eq!(data.transactions.len(), 1);
        assert_eq!(data.transactions[0].kind, TransactionType::Expense);
        assert_eq!(data.transactions[0].account_id, "1");
        assert_eq!(data.account("1").unwrap().balance, Decimal::from(90));
        assert!(data.balance_drift().is_empty());
    }

    #[test]
    fn test_merge_without_duplicates_is_noop() {
        let mut data = LedgerData::default();
        data.accounts = vec![account("1", "Wallet", 10), account("2", "Bank", 100)];
        let before = data.clone();
        assert_eq!(data.merge_duplicate_accounts(), 0);
        assert_eq!(data, before);
    }
}
