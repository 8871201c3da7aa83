use crate::config::ConverterConfig;
use crate::domain::model::{
    format_instant, NormalizedInterval, OutputDocument, PricedInterval, RawInterval,
};
use crate::domain::ports::{Pipeline, PriceSource, Storage};
use crate::domain::services::{
    normalize_value, parse_price, resolve_intervals, select_upcoming, TimestampNormalizer,
};
use crate::utils::error::{EtlError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// 現貨電價管道：抓取（含備援）-> 解析 -> 篩選 -> 定價 -> 寫出
pub struct SpotPricePipeline<S: Storage, P: PriceSource> {
    pub(crate) storage: S,
    pub(crate) source: P,
    pub(crate) config: ConverterConfig,
    fixed_now: Option<DateTime<Utc>>,
}

impl<S: Storage, P: PriceSource> SpotPricePipeline<S, P> {
    pub fn new(storage: S, source: P, config: ConverterConfig) -> Self {
        Self {
            storage,
            source,
            config,
            fixed_now: None,
        }
    }

    /// 固定「現在」時間，讓測試可重現
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.fixed_now = Some(now);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        self.fixed_now.unwrap_or_else(Utc::now)
    }

    /// 依序嘗試主要來源與備援來源，第一個成功者勝出
    async fn fetch_with_fallback(&self) -> Result<serde_json::Value> {
        let urls = self.config.source.urls();

        for (index, url) in urls.iter().enumerate() {
            if index == 0 {
                tracing::info!("⏳ Loading primary source: {}", url);
            } else {
                tracing::warn!("⚠️ Primary source unavailable, trying fallback: {}", url);
            }

            if let Some(json_data) = self.source.fetch_json(url).await {
                return Ok(json_data);
            }
        }

        Err(EtlError::AllSourcesUnavailable {
            attempted: urls.iter().map(|url| url.to_string()).collect(),
        })
    }

    /// 缺值或無法解析的價格以 0 代替並標記為 degraded，不中斷整批資料
    fn normalize(
        &self,
        raw: &RawInterval,
        normalizer: &TimestampNormalizer,
        now: DateTime<Utc>,
    ) -> NormalizedInterval {
        let (raw_price, value_missing) =
            match raw.value_field().and_then(|(_, value)| parse_price(value)) {
                Some(price) => (price, false),
                None => {
                    tracing::warn!(
                        "⚠️ Interval has no numeric value, substituting 0: {:?}",
                        raw.data
                    );
                    (Decimal::ZERO, true)
                }
            };

        let time_str = raw.time_field().map(|(_, s)| s);
        let (instant, time_missing) = match normalizer.parse_timestamp(time_str, now) {
            Some(instant) => (instant, false),
            None => {
                let err = EtlError::TimestampUnparseable {
                    raw: time_str.map(str::to_string),
                };
                tracing::warn!("⚠️ {}; substituting current time", err);
                (now, true)
            }
        };

        NormalizedInterval {
            instant,
            raw_price: normalize_value(raw_price),
            degraded: value_missing || time_missing,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, P: PriceSource> Pipeline for SpotPricePipeline<S, P> {
    async fn extract(&self) -> Result<Vec<RawInterval>> {
        let json_data = self.fetch_with_fallback().await?;
        let records = resolve_intervals(&json_data)?;

        tracing::info!("📊 Extracted {} intervals", records.len());
        Ok(records)
    }

    async fn transform(&self, data: Vec<RawInterval>) -> Result<OutputDocument> {
        let now = self.now();
        let normalizer = self.config.timestamp_normalizer()?;
        let pricing = self.config.pricing_policy()?;
        let offset = self.config.output_offset()?;

        let normalized: Vec<NormalizedInterval> = data
            .iter()
            .map(|raw| self.normalize(raw, &normalizer, now))
            .collect();

        if normalized.is_empty() {
            return Err(EtlError::EmptyData {
                message: "no intervals to transform".to_string(),
            });
        }

        let degraded = normalized.iter().filter(|i| i.degraded).count();
        if degraded > 0 {
            tracing::warn!(
                "⚠️ {} interval(s) had an unparseable timestamp or price",
                degraded
            );
        }

        let selection = select_upcoming(normalized, now, self.config.selection.max_intervals);
        if selection.used_fallback {
            tracing::warn!(
                "⚠️ All intervals are in the past relative to now; using the earliest {} as fallback",
                selection.intervals.len()
            );
        }

        let prices: Vec<PricedInterval> = selection
            .intervals
            .iter()
            .filter_map(|interval| {
                let Some(v) = pricing.apply(interval.raw_price) else {
                    tracing::warn!(
                        "⚠️ Price {} overflows after pricing, dropping interval",
                        interval.raw_price
                    );
                    return None;
                };
                Some(PricedInterval {
                    t: format_instant(interval.instant, offset),
                    v,
                    v_alv: self.config.output.include_v_alv.then_some(v),
                })
            })
            .collect();

        tracing::info!("✅ Transform complete: {} intervals priced", prices.len());
        Ok(OutputDocument::new(now, offset, prices))
    }

    async fn load(&self, document: OutputDocument) -> Result<String> {
        let file_name = &self.config.output.file_name;
        let json_data = serde_json::to_string_pretty(&document)?;

        tracing::debug!("Writing {} bytes to storage", json_data.len());
        self.storage
            .write_file(file_name, json_data.as_bytes())
            .await?;

        let output_path = self.storage.location(file_name);
        tracing::info!("💾 Updated {} interval(s) → {}", document.count, output_path);
        Ok(output_path)
    }
}
