//! Balance application engine
//!
//! Keeps account balances equal to opening balance plus the effects of the
//! stored transactions. Incremental operations (add, update, delete) apply
//! and reverse single effects; [`LedgerData::recalculate_all_balances`] is the
//! ground-truth recompute.

use chrono::Utc;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{CoreError, CoreResult};
use crate::models::{Account, LedgerData, NewTransaction, Transaction, TransactionPatch};
use crate::types::{EffectSign, TransactionType};

/// Fold one transaction's effect into `accounts`
///
/// A referenced account that does not exist is skipped on that side.
pub fn apply_effect(accounts: &mut [Account], tx: &Transaction, sign: EffectSign) {
    let factor = sign.factor();
    for (account_id, delta) in tx.effects() {
        if let Some(account) = accounts.iter_mut().find(|a| a.id == account_id) {
            account.balance += delta * factor;
        }
    }
}

/// Reject transactions that would break the ledger's shape
pub fn validate_transaction(tx: &Transaction) -> CoreResult<()> {
    if tx.amount <= Decimal::ZERO {
        return Err(CoreError::validation(format!(
            "Amount must be positive, got {}",
            tx.amount
        )));
    }
    if tx.kind == TransactionType::Transfer {
        match tx.to_account_id.as_deref() {
            None | Some("") => {
                return Err(CoreError::validation("Transfer requires a destination account"))
            }
            Some(to) if to == tx.account_id => {
                return Err(CoreError::validation(
                    "Transfer destination must differ from the source account",
                ))
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Difference between a stored balance and the recomputed one
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceDrift {
    pub account_id: String,
    pub name: String,
    pub stored: Decimal,
    pub expected: Decimal,
    pub difference: Decimal,
}

impl LedgerData {
    /// Record a new transaction, newest first, and apply its effect
    pub fn add_transaction(&mut self, new: NewTransaction) -> CoreResult<Transaction> {
        let mut tx = Transaction {
            id: wealthweb_utils::generate_id(),
            date: new.date.unwrap_or_else(Utc::now),
            kind: new.kind,
            amount: new.amount,
            account_id: new.account_id,
            to_account_id: new.to_account_id,
            category_id: new.category_id,
            note: new.note,
        };
        tx.normalize();
        validate_transaction(&tx)?;

        apply_effect(&mut self.accounts, &tx, EffectSign::Apply);
        self.transactions.insert(0, tx.clone());
        log::debug!(target: "wealthweb::balance", "added {} {} ({})", tx.kind, tx.amount, tx.id);
        Ok(tx)
    }

    /// Edit a transaction in place; `Ok(None)` when the id is unknown
    pub fn update_transaction(
        &mut self,
        id: &str,
        patch: &TransactionPatch,
    ) -> CoreResult<Option<Transaction>> {
        let Some(index) = self.transactions.iter().position(|t| t.id == id) else {
            log::debug!(target: "wealthweb::balance", "update of unknown transaction {} ignored", id);
            return Ok(None);
        };

        let old = self.transactions[index].clone();
        let next = patch.apply_to(&old);
        validate_transaction(&next)?;

        apply_effect(&mut self.accounts, &old, EffectSign::Reverse);
        apply_effect(&mut self.accounts, &next, EffectSign::Apply);
        self.transactions[index] = next.clone();
        Ok(Some(next))
    }

    /// Remove a transaction and reverse its effect; `None` when the id is unknown
    pub fn delete_transaction(&mut self, id: &str) -> Option<Transaction> {
        let index = self.transactions.iter().position(|t| t.id == id)?;
        let tx = self.transactions.remove(index);
        apply_effect(&mut self.accounts, &tx, EffectSign::Reverse);
        Some(tx)
    }

    /// Reset every balance to its opening balance and replay all transactions
    pub fn recalculate_all_balances(&mut self) {
        for account in self.accounts.iter_mut() {
            account.balance = account.opening_balance;
        }
        for tx in &self.transactions {
            apply_effect(&mut self.accounts, tx, EffectSign::Apply);
        }
        log::debug!(
            target: "wealthweb::balance",
            "recalculated {} accounts from {} transactions",
            self.accounts.len(),
            self.transactions.len()
        );
    }

    /// Accounts whose stored balance disagrees with a full recompute
    pub fn balance_drift(&self) -> Vec<BalanceDrift> {
        let mut expected: HashMap<&str, Decimal> = self
            .accounts
            .iter()
            .map(|a| (a.id.as_str(), a.opening_balance))
            .collect();
        for tx in &self.transactions {
            for (account_id, delta) in tx.effects() {
                if let Some(balance) = expected.get_mut(account_id) {
                    *balance += delta;
                }
            }
        }

        self.accounts
            .iter()
            .filter_map(|account| {
                let expected = expected.get(account.id.as_str()).copied()?;
                (expected != account.balance).then(|| BalanceDrift {
                    account_id: account.id.clone(),
                    name: account.name.clone(),
                    stored: account.balance,
                    expected,
                    difference: account.balance - expected,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AccountKind;
    use chrono::TimeZone;

    fn account(id: &str, opening: i64) -> Account {
        Account {
            id: id.to_string(),
            name: id.to_string(),
            kind: AccountKind::Bank,
            asset_class: None,
            balance: Decimal::from(opening),
            opening_balance: Decimal::from(opening),
            currency: None,
            is_auto_created: false,
        }
    }

    fn new_tx(kind: TransactionType, amount: i64, from: &str, to: Option<&str>) -> NewTransaction {
        NewTransaction {
            date: Some(Utc.with_ymd_and_hms(2025, 1, 10, 0, 0, 0).unwrap()),
            kind,
            amount: Decimal::from(amount),
            account_id: from.to_string(),
            to_account_id: to.map(str::to_string),
            category_id: None,
            note: String::new(),
        }
    }

    fn ledger(accounts: Vec<Account>) -> LedgerData {
        let mut data = LedgerData::default();
        data.accounts = accounts;
        data
    }

    fn balance(data: &LedgerData, id: &str) -> Decimal {
        data.account(id).map(|a| a.balance).unwrap()
    }

    #[test]
    fn test_income_expense_delete() {
        let mut data = ledger(vec![account("checking", 1000)]);
        data.add_transaction(new_tx(TransactionType::Income, 500, "checking", None)).unwrap();
        assert_eq!(balance(&data, "checking"), Decimal::from(1500));

        let expense = data
            .add_transaction(new_tx(TransactionType::Expense, 200, "checking", None))
            .unwrap();
        assert_eq!(balance(&data, "checking"), Decimal::from(1300));

        data.delete_transaction(&expense.id).unwrap();
        assert_eq!(balance(&data, "checking"), Decimal::from(1500));
        assert!(data.balance_drift().is_empty());
    }

    #[test]
    fn test_transfer_symmetry() {
        let mut data = ledger(vec![account("a", 0), account("b", 0)]);
        let tx = data
            .add_transaction(new_tx(TransactionType::Transfer, 300, "a", Some("b")))
            .unwrap();
        assert_eq!(balance(&data, "a"), Decimal::from(-300));
        assert_eq!(balance(&data, "b"), Decimal::from(300));

        data.delete_transaction(&tx.id);
        assert_eq!(balance(&data, "a"), Decimal::ZERO);
        assert_eq!(balance(&data, "b"), Decimal::ZERO);
    }

    #[test]
    fn test_newest_insert_first() {
        let mut data = ledger(vec![account("a", 0)]);
        let first = data.add_transaction(new_tx(TransactionType::Income, 1, "a", None)).unwrap();
        let second = data.add_transaction(new_tx(TransactionType::Income, 2, "a", None)).unwrap();
        assert_eq!(data.transactions[0].id, second.id);
        assert_eq!(data.transactions[1].id, first.id);
    }

    #[test]
    fn test_update_reverses_old_effect() {
        let mut data = ledger(vec![account("a", 100), account("b", 0)]);
        let tx = data.add_transaction(new_tx(TransactionType::Expense, 40, "a", None)).unwrap();
        assert_eq!(balance(&data, "a"), Decimal::from(60));

        let patch = TransactionPatch {
            kind: Some(TransactionType::Transfer),
            amount: Some(Decimal::from(25)),
            to_account_id: Some("b".to_string()),
            ..Default::default()
        };
        let updated = data.update_transaction(&tx.id, &patch).unwrap().unwrap();
        assert_eq!(updated.id, tx.id);
        assert_eq!(balance(&data, "a"), Decimal::from(75));
        assert_eq!(balance(&data, "b"), Decimal::from(25));
        assert_eq!(data.transactions[0], updated);
    }

    #[test]
    fn test_update_and_delete_unknown_id_are_noops() {
        let mut data = ledger(vec![account("a", 10)]);
        let before = data.clone();
        let patch = TransactionPatch {
            amount: Some(Decimal::ONE),
            ..Default::default()
        };
        assert!(data.update_transaction("missing", &patch).unwrap().is_none());
        assert!(data.delete_transaction("missing").is_none());
        assert_eq!(data, before);
    }

    #[test]
    fn test_validation_rejects_bad_transactions() {
        let mut data = ledger(vec![account("a", 0)]);
        assert!(data.add_transaction(new_tx(TransactionType::Income, 0, "a", None)).is_err());
        assert!(data.add_transaction(new_tx(TransactionType::Expense, -5, "a", None)).is_err());
        assert!(data.add_transaction(new_tx(TransactionType::Transfer, 5, "a", None)).is_err());
        assert!(data.add_transaction(new_tx(TransactionType::Transfer, 5, "a", Some("a"))).is_err());
        assert!(data.transactions.is_empty());
        assert_eq!(balance(&data, "a"), Decimal::ZERO);
    }

    #[test]
    fn test_rejected_update_leaves_state() {
        let mut data = ledger(vec![account("a", 0)]);
        let tx = data.add_transaction(new_tx(TransactionType::Income, 10, "a", None)).unwrap();
        let before = data.clone();
        let patch = TransactionPatch {
            amount: Some(Decimal::ZERO),
            ..Default::default()
        };
        assert!(matches!(
            data.update_transaction(&tx.id, &patch),
            Err(CoreError::ValidationError { .. })
        ));
        assert_eq!(data, before);
    }

    #[test]
    fn test_transfer_drops_category() {
        let mut data = ledger(vec![account("a", 0), account("b", 0)]);
        let mut new = new_tx(TransactionType::Transfer, 5, "a", Some("b"));
        new.category_id = Some("cat_3".to_string());
        let tx = data.add_transaction(new).unwrap();
        assert!(tx.category_id.is_none());
    }

    #[test]
    fn test_unknown_account_is_silent() {
        let mut data = ledger(vec![account("a", 0)]);
        data.add_transaction(new_tx(TransactionType::Transfer, 50, "a", Some("ghost")))
            .unwrap();
        assert_eq!(balance(&data, "a"), Decimal::from(-50));
        assert!(data.balance_drift().is_empty());
    }

    #[test]
    fn test_recalculate_matches_incremental_and_is_idempotent() {
        let mut data = ledger(vec![account("a", 100), account("b", 20)]);
        let t1 = data.add_transaction(new_tx(TransactionType::Income, 70, "a", None)).unwrap();
        data.add_transaction(new_tx(TransactionType::Transfer, 30, "a", Some("b"))).unwrap();
        let t3 = data.add_transaction(new_tx(TransactionType::Expense, 15, "b", None)).unwrap();
        data.update_transaction(
            &t1.id,
            &TransactionPatch {
                amount: Some(Decimal::from(90)),
                ..Default::default()
            },
        )
        .unwrap();
        data.delete_transaction(&t3.id);

        let incremental = data.clone();
        data.recalculate_all_balances();
        assert_eq!(data, incremental);
        data.recalculate_all_balances();
        assert_eq!(data, incremental);
    }

    #[test]
    fn test_balance_drift_reports_mismatch() {
        let mut data = ledger(vec![account("a", 100)]);
        data.accounts[0].balance = Decimal::from(90);
        let drift = data.balance_drift();
        assert_eq!(drift.len(), 1);
        assert_eq!(drift[0].expected, Decimal::from(100));
        assert_eq!(drift[0].difference, Decimal::from(-10));

        data.recalculate_all_balances();
        assert!(data.balance_drift().is_empty());
    }
}
