//! Import templates handed to users before a bulk import

use serde::{Deserialize, Serialize};

use crate::error::ImportError;

/// Header of the transaction sheet
pub const TEMPLATE_HEADERS: [&str; 7] = [
    "Date (YYYY-MM-DD)",
    "Type (INCOME/EXPENSE/TRANSFER)",
    "Amount",
    "Account Name",
    "To Account Name",
    "Category Name",
    "Note",
];

/// Two CSV sheets: the transaction sheet and the valid-values reference sheet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportTemplate {
    pub transactions_csv: String,
    /// Column A lists account names, column B category names
    pub valid_values_csv: String,
}

/// Build the template from the current account and category names
pub fn generate_template(account_names: &[String], category_names: &[String]) -> Result<ImportTemplate, ImportError> {
    let account = account_names.first().map(String::as_str).unwrap_or("Bank");
    let category = category_names.first().map(String::as_str).unwrap_or("Salary");

    let mut sheet = csv::Writer::from_writer(Vec::new());
    sheet.write_record(TEMPLATE_HEADERS)?;
    sheet.write_record(["2025-01-01", "INCOME", "5000", account, "", category, "Example Entry"])?;

    let mut valid = csv::Writer::from_writer(Vec::new());
    let max_rows = account_names.len().max(category_names.len());
    for i in 0..max_rows {
        let account = account_names.get(i).map(String::as_str).unwrap_or("");
        let category = category_names.get(i).map(String::as_str).unwrap_or("");
        valid.write_record([account, category])?;
    }

    Ok(ImportTemplate {
        transactions_csv: into_string(sheet)?,
        valid_values_csv: into_string(valid)?,
    })
}

fn into_string(writer: csv::Writer<Vec<u8>>) -> Result<String, ImportError> {
    let bytes = writer.into_inner().map_err(|e| ImportError::Csv {
        line: 0,
        message: e.to_string(),
    })?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
