use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;
use std::str::FromStr;

/// 超過此數值即視為 EUR/MWh。這只是依數量級推測的近似規則
const MWH_THRESHOLD: Decimal = Decimal::ONE_HUNDRED;

/// EUR/MWh -> c/kWh
const MWH_TO_CENTS_KWH: Decimal = Decimal::TEN;

/// 把 JSON 數值或數字字串轉為 Decimal
pub fn parse_price(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_decimal(&n.to_string()),
        Value::String(s) => parse_decimal(&s.trim().replace(',', ".")),
        _ => None,
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// 統一換算為 c/kWh，保留完整精度
pub fn normalize_value(raw: Decimal) -> Decimal {
    if raw.abs() > MWH_THRESHOLD {
        raw / MWH_TO_CENTS_KWH
    } else {
        raw
    }
}

/// 兩位小數，中點遠離零
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// 稅率乘數與固定加價
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingPolicy {
    pub tax_multiplier: Decimal,
    pub margin: Decimal,
}

impl PricingPolicy {
    pub fn new(tax_multiplier: Decimal, margin: Decimal) -> Self {
        Self {
            tax_multiplier,
            margin,
        }
    }

    /// 從設定檔的浮點數建立；以十進位字串轉換避免二進位誤差
    pub fn from_f64(tax_multiplier: f64, margin: f64) -> Option<Self> {
        Some(Self::new(
            parse_decimal(&tax_multiplier.to_string())?,
            parse_decimal(&margin.to_string())?,
        ))
    }

    /// `round2(raw * tax_multiplier + margin)`，只在最後四捨五入一次。
    /// 超出 Decimal 範圍時回傳 `None`
    pub fn apply(&self, raw_cents: Decimal) -> Option<Decimal> {
        raw_cents
            .checked_mul(self.tax_multiplier)?
            .checked_add(self.margin)
            .map(round2)
    }
}
