//! CSV and JSON row parsers plus date/amount normalisation

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::error::ImportError;
use crate::types::ImportRow;

/// Column positions for one header layout
#[derive(Debug, Clone, Copy, PartialEq)]
struct ColumnLayout {
    date: usize,
    kind: usize,
    amount: usize,
    account: usize,
    to_account: Option<usize>,
    category: usize,
    note: usize,
}

/// `Date, Type, Amount, Account Name, Category Name, Note`
const LEGACY_LAYOUT: ColumnLayout = ColumnLayout {
    date: 0,
    kind: 1,
    amount: 2,
    account: 3,
    to_account: None,
    category: 4,
    note: 5,
};

/// `Date, Type, Amount, Account Name, To Account Name, Category Name, Note`
const TRANSFER_LAYOUT: ColumnLayout = ColumnLayout {
    date: 0,
    kind: 1,
    amount: 2,
    account: 3,
    to_account: Some(4),
    category: 5,
    note: 6,
};

/// Line-oriented CSV parser for transaction sheets
pub struct CsvRowParser;

impl CsvRowParser {
    /// Parse CSV text; the first line is always treated as the header
    pub fn parse(content: &str) -> Result<Vec<ImportRow>, ImportError> {
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let layout = {
            let headers = reader.headers()?;
            let layout = Self::detect_layout(headers);
            Self::check_columns(headers, layout)?;
            layout
        };

        let mut rows = Vec::new();
        for (index, result) in reader.records().enumerate() {
            let record = result?;
            match Self::row_from_record(&record, layout) {
                Some(row) => rows.push(row),
                None => log::debug!(
                    target: "wealthweb::import",
                    "dropping CSV line {}: missing date or amount",
                    index + 2
                ),
            }
        }

        Ok(rows)
    }

    fn detect_layout(headers: &csv::StringRecord) -> ColumnLayout {
        static TO_ACCOUNT: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
        let to_account = TO_ACCOUNT.get_or_init(|| regex::Regex::new(r"(?i)^to[\s_]*account").unwrap());

        if headers.iter().any(|h| to_account.is_match(h)) {
            TRANSFER_LAYOUT
        } else {
            LEGACY_LAYOUT
        }
    }

    fn check_columns(headers: &csv::StringRecord, layout: ColumnLayout) -> Result<(), ImportError> {
        // Note may be absent; everything before it is required
        let required = layout.note;
        if headers.len() < required {
            let names = if layout.to_account.is_some() {
                ["Date", "Type", "Amount", "Account Name", "To Account Name", "Category Name"].as_slice()
            } else {
                ["Date", "Type", "Amount", "Account Name", "Category Name"].as_slice()
            };
            return Err(ImportError::MissingColumn {
                column: names[headers.len()].to_string(),
            });
        }
        Ok(())
    }

    fn row_from_record(record: &csv::StringRecord, layout: ColumnLayout) -> Option<ImportRow> {
        let cell = |idx: usize| record.get(idx).map(str::trim).unwrap_or("");
        let optional = |idx: usize| {
            let value = cell(idx);
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        };

        let date = cell(layout.date);
        let amount = parse_amount(cell(layout.amount));
        if date.is_empty() || amount.is_none() {
            return None;
        }

        Some(ImportRow {
            date: date.to_string(),
            kind: cell(layout.kind).to_uppercase(),
            amount,
            account_name: cell(layout.account).to_string(),
            to_account_name: layout.to_account.and_then(|idx| optional(idx)),
            category_name: optional(layout.category),
            note: optional(layout.note),
        })
    }
}

/// Parser for an array of JSON row objects
pub struct JsonRowParser;

impl JsonRowParser {
    pub fn parse(content: &str) -> Result<Vec<ImportRow>, ImportError> {
        let rows: Vec<ImportRow> = serde_json::from_str(content)?;
        Ok(rows
            .into_iter()
            .map(|mut row| {
                row.kind = row.kind.trim().to_uppercase();
                row
            })
            .collect())
    }
}

/// Parse an amount cell, ignoring currency symbols, spaces and thousands separators
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    static NOISE: once_cell::sync::OnceCell<regex::Regex> = once_cell::sync::OnceCell::new();
    let noise = NOISE.get_or_init(|| regex::Regex::new(r"[^0-9.\-]").unwrap());

    let cleaned = noise.replace_all(raw.trim(), "");
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned).ok()
}

/// Parse an import date into a UTC instant
///
/// Anything containing `-` is a calendar date (time part ignored) at midnight
/// UTC. Everything else goes through the general parser: RFC 3339, RFC 2822,
/// `MM/DD/YYYY`, `YYYY/MM/DD` and spreadsheet serial day numbers.
pub fn parse_import_date(raw: &str) -> Option<DateTime<Utc>> {
    let value = raw.trim();
    if value.is_empty() {
        return None;
    }

    if value.contains('-') {
        let day_part = value
            .split(|c: char| c == 'T' || c == ' ')
            .next()
            .unwrap_or(value);
        return NaiveDate::parse_from_str(day_part, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(day_part, "%d-%m-%Y"))
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| Utc.from_utc_datetime(&dt));
    }

    parse_general_date(value)
}

fn parse_general_date(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%m/%d/%Y", "%Y/%m/%d", "%m/%d/%y"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return date.and_hms_opt(0, 0, 0).map(|dt| Utc.from_utc_datetime(&dt));
        }
    }
    for format in ["%m/%d/%Y %H:%M:%S", "%Y/%m/%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(Utc.from_utc_datetime(&dt));
        }
    }
    value.parse::<f64>().ok().and_then(spreadsheet_serial_to_datetime)
}

/// Convert a spreadsheet serial day number (days since 1899-12-30) to UTC
fn spreadsheet_serial_to_datetime(serial: f64) -> Option<DateTime<Utc>> {
    if !serial.is_finite() || serial <= 0.0 || serial >= 2_958_466.0 {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_hms_opt(0, 0, 0)?;
    let days = serial.trunc() as i64;
    let seconds = (serial.fract() * 86_400.0).round() as i64;
    let dt = epoch + Duration::days(days) + Duration::seconds(seconds);
    Some(Utc.from_utc_datetime(&dt))
}
