//! Row types shared by the import parsers

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One raw transaction row as read from a spreadsheet, CSV file or JSON payload
///
/// Names are unresolved; the ledger matches them against existing accounts and
/// categories when the batch is reconciled.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRow {
    #[serde(default)]
    pub date: String,
    /// `INCOME`, `EXPENSE` or `TRANSFER`
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub account_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ImportRow {
    /// A row is usable only with a date and a non-zero amount
    pub fn is_complete(&self) -> bool {
        !self.date.trim().is_empty() && self.amount.map_or(false, |a| !a.is_zero())
    }
}

/// Supported import payload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportFormat {
    Csv,
    Json,
}

impl std::str::FromStr for ImportFormat {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(ImportFormat::Csv),
            "json" => Ok(ImportFormat::Json),
            _ => Err(format!("Invalid import format: {}", s)),
        }
    }
}

impl std::fmt::Display for ImportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportFormat::Csv => write!(f, "csv"),
            ImportFormat::Json => write!(f, "json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_deserializes_from_camel_case() {
        let row: ImportRow = serde_json::from_str(
            r#"{"date":"2025-01-01","type":"INCOME","amount":100,"accountName":"Cash","categoryName":"Salary"}"#,
        )
        .unwrap();
        assert_eq!(row.kind, "INCOME");
        assert_eq!(row.amount, Some(Decimal::from(100)));
        assert_eq!(row.account_name, "Cash");
        assert_eq!(row.category_name.as_deref(), Some("Salary"));
        assert!(row.to_account_name.is_none());
        assert!(row.is_complete());
    }

    #[test]
    fn test_incomplete_rows() {
        let mut row = ImportRow {
            date: "2025-01-01".to_string(),
            amount: Some(Decimal::ZERO),
            ..Default::default()
        };
        assert!(!row.is_complete());
        row.amount = Some(Decimal::ONE);
        assert!(row.is_complete());
        row.date = "  ".to_string();
        assert!(!row.is_complete());
    }
}
