//! Account, category, asset class, goal and profile management

use rust_decimal::Decimal;

use wealthweb_utils::generate_id;

use crate::balance::apply_effect;
use crate::error::{CoreError, CoreResult};
use crate::models::{
    Account, AccountPatch, AssetClass, Category, Goal, GoalPatch, LedgerData, NewAccount,
    NewCategory, NewGoal, Transaction,
};
use crate::types::EffectSign;

fn require_name(name: &str, what: &str) -> CoreResult<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CoreError::validation(format!("{} name must not be empty", what)));
    }
    Ok(name.to_string())
}

impl LedgerData {
    // ==================== Accounts ====================

    pub fn add_account(&mut self, new: NewAccount) -> CoreResult<Account> {
        let account = Account {
            id: generate_id(),
            name: require_name(&new.name, "Account")?,
            kind: new.kind,
            asset_class: new.asset_class.filter(|c| !c.trim().is_empty()),
            balance: new.opening_balance,
            opening_balance: new.opening_balance,
            currency: new.currency,
            is_auto_created: false,
        };
        self.accounts.push(account.clone());
        Ok(account)
    }

    /// Edit an account; a new opening balance shifts the balance by the same delta
    pub fn update_account(&mut self, id: &str, patch: AccountPatch) -> CoreResult<Account> {
        let name = patch.name.as_deref().map(|n| require_name(n, "Account")).transpose()?;
        let account = self
            .accounts
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| CoreError::AccountNotFound { id: id.to_string() })?;

        if let Some(name) = name {
            account.name = name;
        }
        if let Some(kind) = patch.kind {
            account.kind = kind;
        }
        if let Some(asset_class) = patch.asset_class {
            account.asset_class = Some(asset_class).filter(|c| !c.trim().is_empty());
        }
        if let Some(opening) = patch.opening_balance {
            account.balance += opening - account.opening_balance;
            account.opening_balance = opening;
        }
        if let Some(currency) = patch.currency {
            account.currency = Some(currency);
        }
        Ok(account.clone())
    }

    /// Delete an account and every transaction that references it
    ///
    /// The removed transactions' effects on the surviving side are reversed.
    pub fn delete_account(&mut self, id: &str) -> CoreResult<(Account, Vec<Transaction>)> {
        let index = self
            .accounts
            .iter()
            .position(|a| a.id == id)
            .ok_or_else(|| CoreError::AccountNotFound { id: id.to_string() })?;
        let account = self.accounts.remove(index);

        let (removed, kept): (Vec<Transaction>, Vec<Transaction>) = std::mem::take(&mut self.transactions)
            .into_iter()
            .partition(|t| t.involves_account(id));
        self.transactions = kept;
        for tx in &removed {
            apply_effect(&mut self.accounts, tx, EffectSign::Reverse);
        }

        log::debug!(
            target: "wealthweb::entities",
            "deleted account '{}' and {} transactions",
            account.name,
            removed.len()
        );
        Ok((account, removed))
    }

    // ==================== Categories ====================

    pub fn add_category(&mut self, new: NewCategory) -> CoreResult<Category> {
        let category = Category {
            id: generate_id(),
            name: require_name(&new.name, "Category")?,
            kind: new.kind,
            icon: new.icon,
            is_auto_created: false,
        };
        self.categories.push(category.clone());
        Ok(category)
    }

    /// Transactions keep the dangling id
    pub fn delete_category(&mut self, id: &str) -> CoreResult<Category> {
        let index = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CoreError::CategoryNotFound { id: id.to_string() })?;
        Ok(self.categories.remove(index))
    }

    // ==================== Asset classes ====================

    pub fn add_asset_class(&mut self, name: &str) -> CoreResult<AssetClass> {
        let asset_class = AssetClass {
            id: generate_id(),
            name: require_name(name, "Asset class")?,
        };
        self.asset_classes.push(asset_class.clone());
        Ok(asset_class)
    }

    /// Accounts tagged with the class keep the name
    pub fn delete_asset_class(&mut self, id: &str) -> Option<AssetClass> {
        let index = self.asset_classes.iter().position(|c| c.id == id)?;
        Some(self.asset_classes.remove(index))
    }

    // ==================== Goals ====================

    pub fn add_goal(&mut self, new: NewGoal) -> CoreResult<Goal> {
        if new.target_amount < Decimal::ZERO {
            return Err(CoreError::validation("Goal target must not be negative"));
        }
        let goal = Goal {
            id: generate_id(),
            name: require_name(&new.name, "Goal")?,
            target_amount: new.target_amount,
            current_amount: new.current_amount,
            deadline: new.deadline,
            icon: new.icon,
        };
        self.goals.push(goal.clone());
        Ok(goal)
    }

    pub fn update_goal(&mut self, id: &str, patch: GoalPatch) -> CoreResult<Goal> {
        if patch.target_amount.map_or(false, |t| t < Decimal::ZERO) {
            return Err(CoreError::validation("Goal target must not be negative"));
        }
        let name = patch.name.as_deref().map(|n| require_name(n, "Goal")).transpose()?;
        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| CoreError::GoalNotFound { id: id.to_string() })?;

        if let Some(name) = name {
            goal.name = name;
        }
        if let Some(target) = patch.target_amount {
            goal.target_amount = target;
        }
        if let Some(current) = patch.current_amount {
            goal.current_amount = current;
        }
        if let Some(deadline) = patch.deadline {
            goal.deadline = deadline;
        }
        if let Some(icon) = patch.icon {
            goal.icon = icon;
        }
        Ok(goal.clone())
    }

    pub fn delete_goal(&mut self, id: &str) -> CoreResult<Goal> {
        let index = self
            .goals
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| CoreError::GoalNotFound { id: id.to_string() })?;
        Ok(self.goals.remove(index))
    }

    /// Add money to a goal's saved amount
    pub fn contribute_to_goal(&mut self, id: &str, amount: Decimal) -> CoreResult<Goal> {
        if amount <= Decimal::ZERO {
            return Err(CoreError::validation("Contribution must be positive"));
        }
        let goal = self
            .goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| CoreError::GoalNotFound { id: id.to_string() })?;
        goal.current_amount += amount;
        Ok(goal.clone())
    }

    // ==================== Profile ====================

    pub fn update_currency(&mut self, symbol: &str) -> CoreResult<()> {
        if symbol.trim().is_empty() {
            return Err(CoreError::validation("Currency must not be empty"));
        }
        self.user.currency = symbol.trim().to_string();
        Ok(())
    }

    pub fn update_user_name(&mut self, name: &str) -> CoreResult<()> {
        self.user.name = require_name(name, "User")?;
        Ok(())
    }

    /// Change name and currency together; nothing changes if either is invalid
    pub fn update_profile(&mut self, name: Option<&str>, currency: Option<&str>) -> CoreResult<()> {
        let mut user = self.user.clone();
        if let Some(name) = name {
            user.name = require_name(name, "User")?;
        }
        if let Some(currency) = currency {
            if currency.trim().is_empty() {
                return Err(CoreError::validation("Currency must not be empty"));
            }
            user.currency = currency.trim().to_string();
        }
        self.user = user;
        Ok(())
    }
}
