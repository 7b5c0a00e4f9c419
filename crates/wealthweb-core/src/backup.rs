//! Backup export and restore

use crate::error::{CoreError, CoreResult};
use crate::models::LedgerData;

/// Keys a backup must carry to be accepted
pub const REQUIRED_BACKUP_KEYS: [&str; 2] = ["user", "accounts"];

/// Serialize the full state
pub fn export_json(data: &LedgerData, pretty: bool) -> CoreResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(data)?
    } else {
        serde_json::to_string(data)?
    };
    Ok(json)
}

/// Validate and decode a backup document
///
/// Only the presence of `user` and `accounts` is checked up front; missing
/// collections default to empty.
pub fn parse_backup(value: serde_json::Value) -> CoreResult<LedgerData> {
    let Some(object) = value.as_object() else {
        return Err(CoreError::InvalidFormat {
            message: "backup must be a JSON object".to_string(),
        });
    };
    if let Some(missing) = REQUIRED_BACKUP_KEYS.iter().copied().find(|k| !object.contains_key(*k)) {
        return Err(CoreError::InvalidFormat {
            message: format!("backup is missing `{}`", missing),
        });
    }

    serde_json::from_value(value).map_err(|e| CoreError::InvalidFormat {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_export_then_parse_is_identical() {
        let mut data = LedgerData::default();
        data.user.name = "Ana".to_string();
        data.add_asset_class("Crypto").unwrap();

        let json = export_json(&data, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parse_backup(value).unwrap(), data);
    }

    #[test]
    fn test_missing_keys_rejected() {
        let err = parse_backup(json!({ "user": { "name": "A", "currency": "$" } })).unwrap_err();
        assert!(matches!(err, CoreError::InvalidFormat { .. }));
        assert!(err.to_string().contains("accounts"));

        assert!(parse_backup(json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_minimal_backup_defaults_collections() {
        let data = parse_backup(json!({
            "user": { "name": "A", "currency": "$" },
            "accounts": []
        }))
        .unwrap();
        assert!(data.transactions.is_empty());
        assert!(data.categories.is_empty());
    }
}
