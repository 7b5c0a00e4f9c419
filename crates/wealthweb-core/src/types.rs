//! Basic types for the core ledger module

use serde::{Deserialize, Serialize};

/// Account kind enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountKind {
    /// Bank accounts (checking, savings)
    Bank,
    /// Cash on hand, wallets
    Cash,
    /// Investments and other holdings tagged with an asset class
    Asset,
}

impl Default for AccountKind {
    fn default() -> Self {
        AccountKind::Cash
    }
}

impl std::str::FromStr for AccountKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "BANK" => Ok(AccountKind::Bank),
            "CASH" => Ok(AccountKind::Cash),
            "ASSET" | "ASSETS" => Ok(AccountKind::Asset),
            _ => Err(format!("Invalid account type: {}", s)),
        }
    }
}

impl std::fmt::Display for AccountKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountKind::Bank => write!(f, "BANK"),
            AccountKind::Cash => write!(f, "CASH"),
            AccountKind::Asset => write!(f, "ASSET"),
        }
    }
}

/// Transaction type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    /// Money in to `account_id`
    Income,
    /// Money out of `account_id`
    Expense,
    /// Money moved from `account_id` to `to_account_id`
    Transfer,
}

impl TransactionType {
    /// Category type matching this transaction type, if any
    pub fn category_type(&self) -> Option<CategoryType> {
        match self {
            TransactionType::Income => Some(CategoryType::Income),
            TransactionType::Expense => Some(CategoryType::Expense),
            TransactionType::Transfer => None,
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INCOME" => Ok(TransactionType::Income),
            "EXPENSE" => Ok(TransactionType::Expense),
            "TRANSFER" => Ok(TransactionType::Transfer),
            _ => Err(format!("Invalid transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionType::Income => write!(f, "INCOME"),
            TransactionType::Expense => write!(f, "EXPENSE"),
            TransactionType::Transfer => write!(f, "TRANSFER"),
        }
    }
}

/// Category type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CategoryType {
    Income,
    Expense,
}

impl std::str::FromStr for CategoryType {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "INCOME" => Ok(CategoryType::Income),
            "EXPENSE" => Ok(CategoryType::Expense),
            _ => Err(format!("Invalid category type: {}", s)),
        }
    }
}

impl std::fmt::Display for CategoryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryType::Income => write!(f, "INCOME"),
            CategoryType::Expense => write!(f, "EXPENSE"),
        }
    }
}

/// Direction in which a transaction's effect is folded into balances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectSign {
    Apply,
    Reverse,
}

impl EffectSign {
    pub fn factor(&self) -> rust_decimal::Decimal {
        match self {
            EffectSign::Apply => rust_decimal::Decimal::ONE,
            EffectSign::Reverse => rust_decimal::Decimal::NEGATIVE_ONE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_from_str() {
        assert_eq!("income".parse::<TransactionType>().unwrap(), TransactionType::Income);
        assert_eq!(" EXPENSE ".parse::<TransactionType>().unwrap(), TransactionType::Expense);
        assert_eq!("Transfer".parse::<TransactionType>().unwrap(), TransactionType::Transfer);
        assert!("refund".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_serde_uses_upper_case_tags() {
        assert_eq!(serde_json::to_string(&AccountKind::Bank).unwrap(), "\"BANK\"");
        assert_eq!(serde_json::to_string(&TransactionType::Transfer).unwrap(), "\"TRANSFER\"");
        let kind: CategoryType = serde_json::from_str("\"EXPENSE\"").unwrap();
        assert_eq!(kind, CategoryType::Expense);
    }

    #[test]
    fn test_category_type_for_transaction() {
        assert_eq!(TransactionType::Income.category_type(), Some(CategoryType::Income));
        assert_eq!(TransactionType::Transfer.category_type(), None);
    }

    #[test]
    fn test_account_kind_display_round_trip() {
        for kind in [AccountKind::Bank, AccountKind::Cash, AccountKind::Asset] {
            assert_eq!(kind.to_string().parse::<AccountKind>().unwrap(), kind);
        }
    }
}
