use crate::domain::model::RawInterval;
use crate::utils::error::{EtlError, Result};
use serde_json::Value;

/// 區間陣列可能的鍵名，依優先順序
pub const INTERVAL_KEYS: &[&str] = &["min15", "Min15", "data", "Prices", "prices", "PricesList"];

pub const TIME_KEYS: &[&str] = &["time", "StartTime", "t", "Time", "start", "Date"];

pub const VALUE_KEYS: &[&str] = &["value", "Value", "v", "price", "Price"];

/// 在頂層文件中找出第一個為陣列的候選鍵
pub fn find_interval_key(doc: &Value) -> Option<&'static str> {
    INTERVAL_KEYS
        .iter()
        .copied()
        .find(|key| doc.get(key).map(Value::is_array).unwrap_or(false))
}

pub fn resolve_intervals(doc: &Value) -> Result<Vec<RawInterval>> {
    let key = find_interval_key(doc).ok_or_else(|| EtlError::EmptyData {
        message: format!(
            "no interval array under any of: {}",
            INTERVAL_KEYS.join(", ")
        ),
    })?;

    let items = doc
        .get(key)
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    if items.is_empty() {
        return Err(EtlError::EmptyData {
            message: format!("interval array '{}' is empty", key),
        });
    }

    tracing::debug!("Resolved {} intervals under '{}'", items.len(), key);
    Ok(items.into_iter().map(RawInterval::from).collect())
}

impl RawInterval {
    /// 第一個非空字串的時間欄位
    pub fn time_field(&self) -> Option<(&'static str, &str)> {
        TIME_KEYS.iter().copied().find_map(|key| {
            self.data
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(|s| (key, s))
        })
    }

    /// 第一個非 null 的數值欄位（數字或數字字串皆可）
    pub fn value_field(&self) -> Option<(&'static str, &Value)> {
        VALUE_KEYS.iter().copied().find_map(|key| {
            self.data
                .get(key)
                .filter(|v| !v.is_null())
                .map(|v| (key, v))
        })
    }
}
