use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 上游回傳的單筆區間，欄位名稱與型別皆不保證
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawInterval {
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl From<serde_json::Value> for RawInterval {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Object(data) => Self { data },
            _ => Self::default(),
        }
    }
}

/// 已換算為 c/kWh 的區間。`raw_price` 保留完整精度，只在定價時四捨五入一次
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedInterval {
    pub instant: DateTime<Utc>,
    pub raw_price: Decimal,
    /// 時間戳無法解析而以 now 代替
    pub degraded: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricedInterval {
    pub t: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub v: Decimal,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub v_alv: Option<Decimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputDocument {
    pub updated: String,
    pub count: usize,
    pub prices: Vec<PricedInterval>,
}

impl OutputDocument {
    /// `prices` 必須已依時間遞增排序
    pub fn new(updated: DateTime<Utc>, offset: FixedOffset, prices: Vec<PricedInterval>) -> Self {
        Self {
            updated: format_instant(updated, offset),
            count: prices.len(),
            prices,
        }
    }
}

/// RFC 3339，毫秒精度；零偏移時以 `Z` 結尾
pub fn format_instant(instant: DateTime<Utc>, offset: FixedOffset) -> String {
    instant
        .with_timezone(&offset)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}
