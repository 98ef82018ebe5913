//! Transaction ledger input.
//!
//! The ledger is a JSON array of lending-protocol transaction records. Records
//! are decoded leniently: a field with the wrong JSON type is treated as
//! absent rather than failing the whole file.

use crate::utils::error::{Error, Result};
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::path::Path;

/// Raw token amounts are integers scaled by this factor
pub const AMOUNT_SCALE: f64 = 1e6;

/// A single ledger record
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Transaction {
    #[serde(rename = "userWallet", default, deserialize_with = "lenient_string")]
    pub user_wallet: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub action: Option<String>,
    /// Nested `{ amount, assetPriceUSD, ... }` payload, kept raw
    #[serde(rename = "actionData", default)]
    pub action_data: Value,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub timestamp: Option<i64>,
}

/// Kind of a transaction as far as aggregation is concerned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Deposit,
    Borrow,
    Other,
}

/// Outcome of valuing a transaction in USD
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UsdValue {
    Usd(f64),
    /// Amount or price missing, of the wrong type, or not a finite number
    Unparseable,
}

impl UsdValue {
    /// Collapse to a plain number; unparseable values count as $0
    pub fn or_zero(self) -> f64 {
        match self {
            | UsdValue::Usd(v) => v,
            | UsdValue::Unparseable => 0.0,
        }
    }

    pub fn is_unparseable(&self) -> bool {
        matches!(self, UsdValue::Unparseable)
    }
}

impl Transaction {
    /// Wallet identifier, if present and non-empty
    pub fn wallet(&self) -> Option<&str> {
        self.user_wallet.as_deref().filter(|w| !w.is_empty())
    }

    pub fn action_kind(&self) -> ActionKind {
        match self.action.as_deref() {
            | Some(a) if a.eq_ignore_ascii_case("deposit") => ActionKind::Deposit,
            | Some(a) if a.eq_ignore_ascii_case("borrow") => ActionKind::Borrow,
            | _ => ActionKind::Other,
        }
    }

    /// `amount / 1e6 * assetPriceUSD`
    pub fn usd_value(&self) -> UsdValue {
        let amount = self.action_data.get("amount").and_then(numeric);
        let price = self.action_data.get("assetPriceUSD").and_then(numeric);
        match (amount, price) {
            | (Some(amount), Some(price)) => {
                let usd = amount / AMOUNT_SCALE * price;
                if usd.is_finite() {
                    UsdValue::Usd(usd)
                } else {
                    UsdValue::Unparseable
                }
            }
            | _ => UsdValue::Unparseable,
        }
    }

    /// UTC calendar date of the transaction; a missing or zero timestamp has none
    pub fn active_date(&self) -> Option<NaiveDate> {
        let ts = self.timestamp.filter(|ts| *ts != 0)?;
        DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
    }
}

/// Numbers may arrive as JSON numbers or as numeric strings
fn numeric(value: &Value) -> Option<f64> {
    let n = match value {
        | Value::Number(n) => n.as_f64(),
        | Value::String(s) => s.trim().parse::<f64>().ok(),
        | _ => None,
    }?;
    n.is_finite().then_some(n)
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().map(str::to_string))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        | Value::Number(n) => n.as_i64().or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64)),
        | Value::String(s) => s.trim().parse::<i64>().ok(),
        | _ => None,
    })
}

/// Decoded ledger plus the number of array elements that were not objects
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub transactions: Vec<Transaction>,
    pub rejected: usize,
}

impl Ledger {
    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Parse a ledger from its JSON text
pub fn parse_transactions(json: &str) -> Result<Ledger> {
    let root: Value = serde_json::from_str(json)?;
    let items = match root {
        | Value::Array(items) => items,
        | other => {
            return Err(Error::DataError(format!(
                "expected a JSON array of transactions, found {}",
                json_kind(&other)
            )))
        }
    };

    let mut ledger = Ledger { transactions: Vec::with_capacity(items.len()), rejected: 0 };
    for (idx, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            log::debug!("ledger element {} is {}, ignoring", idx, json_kind(&item));
            ledger.rejected += 1;
            continue;
        }
        ledger.transactions.push(serde_json::from_value(item)?);
    }
    Ok(ledger)
}

/// Read and parse the ledger file at `path`
pub fn load_transactions<P: AsRef<Path>>(path: P) -> Result<Ledger> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::DataError(format!("cannot read ledger {}: {}", path.display(), e)))?;
    let ledger = parse_transactions(&content)?;
    log::info!("Loaded {} transactions from {}", ledger.len(), path.display());
    if ledger.rejected > 0 {
        log::warn!("{} ledger elements were not transaction objects", ledger.rejected);
    }
    Ok(ledger)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        | Value::Null => "null",
        | Value::Bool(_) => "a boolean",
        | Value::Number(_) => "a number",
        | Value::String(_) => "a string",
        | Value::Array(_) => "an array",
        | Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tx(value: Value) -> Transaction {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_usd_value_from_strings() {
        let t = tx(json!({
            "userWallet": "0xabc",
            "action": "deposit",
            "actionData": { "amount": "1000000", "assetPriceUSD": "2000" },
            "timestamp": 1629178166
        }));
        assert_eq!(t.usd_value(), UsdValue::Usd(2000.0));
        assert_eq!(t.action_kind(), ActionKind::Deposit);
    }

    #[test]
    fn test_usd_value_from_numbers() {
        let t = tx(json!({ "actionData": { "amount": 2500000, "assetPriceUSD": 1.5 } }));
        assert_eq!(t.usd_value(), UsdValue::Usd(3.75));
    }

    #[test]
    fn test_malformed_fields_are_unparseable() {
        let cases = [
            json!({}),
            json!({ "actionData": null }),
            json!({ "actionData": "oops" }),
            json!({ "actionData": { "amount": "1000000" } }),
            json!({ "actionData": { "assetPriceUSD": "3" } }),
            json!({ "actionData": { "amount": "abc", "assetPriceUSD": "3" } }),
            json!({ "actionData": { "amount": [1], "assetPriceUSD": "3" } }),
            json!({ "actionData": { "amount": "inf", "assetPriceUSD": "3" } }),
            json!({ "actionData": { "amount": "NaN", "assetPriceUSD": "3" } }),
        ];
        for case in cases {
            let v = tx(case.clone()).usd_value();
            assert!(v.is_unparseable(), "{case} should be unparseable");
            assert_eq!(v.or_zero(), 0.0);
        }
    }

    #[test]
    fn test_action_is_case_insensitive() {
        assert_eq!(tx(json!({ "action": "DePoSiT" })).action_kind(), ActionKind::Deposit);
        assert_eq!(tx(json!({ "action": "BORROW" })).action_kind(), ActionKind::Borrow);
        assert_eq!(tx(json!({ "action": "repay" })).action_kind(), ActionKind::Other);
        assert_eq!(tx(json!({ "action": 7 })).action_kind(), ActionKind::Other);
        assert_eq!(tx(json!({})).action_kind(), ActionKind::Other);
    }

    #[test]
    fn test_wallet_missing_or_wrong_type() {
        assert_eq!(tx(json!({ "userWallet": "w" })).wallet(), Some("w"));
        assert_eq!(tx(json!({ "userWallet": "" })).wallet(), None);
        assert_eq!(tx(json!({ "userWallet": 12 })).wallet(), None);
        assert_eq!(tx(json!({ "userWallet": null })).wallet(), None);
        assert_eq!(tx(json!({})).wallet(), None);
    }

    #[test]
    fn test_active_date_is_utc() {
        // 2021-08-17T05:29:26Z
        let t = tx(json!({ "timestamp": 1629178166 }));
        assert_eq!(t.active_date(), NaiveDate::from_ymd_opt(2021, 8, 17));
        assert_eq!(tx(json!({ "timestamp": 0 })).active_date(), None);
        assert_eq!(tx(json!({ "timestamp": "soon" })).active_date(), None);
        assert_eq!(tx(json!({})).active_date(), None);
    }

    #[test]
    fn test_parse_transactions_rejects_non_array() {
        let err = parse_transactions(r#"{"userWallet": "a"}"#).unwrap_err();
        assert!(matches!(err, Error::DataError(_)));
        assert!(parse_transactions("not json").is_err());
    }

    #[test]
    fn test_parse_transactions_skips_non_objects() {
        let ledger = parse_transactions(r#"[{"userWallet": "a"}, 3, "x", {"userWallet": "b"}]"#).unwrap();
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.rejected, 2);
    }

    #[test]
    fn test_empty_array_is_valid() {
        let ledger = parse_transactions("[]").unwrap();
        assert!(ledger.is_empty());
    }
}
