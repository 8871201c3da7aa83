use crate::domain::services::{LocalZone, PricingPolicy, TimestampNormalizer};
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use chrono::{Duration, FixedOffset};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_PRIMARY_URL: &str = "https://www.porssisahkoa.fi/api/Prices/GetPrices?mode=1";
pub const DEFAULT_FALLBACK_URL: &str = "https://elspotcontrol.netlify.app/spotprices-v01-FI.json";

static ENV_PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is a valid regex"));

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterConfig {
    pub source: SourceConfig,
    pub pricing: PricingConfig,
    pub selection: SelectionConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub primary_url: String,
    pub fallback_url: Option<String>,
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub tax_multiplier: f64,
    /// c/kWh
    pub margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionConfig {
    pub max_intervals: usize,
    pub lookback_hours: i64,
    pub horizon_hours: i64,
    /// IANA 時區名稱；未設定時使用系統時區
    pub local_timezone: Option<String>,
    pub fallback_offset_hours: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub output_dir: String,
    pub file_name: String,
    /// 輸出時間的偏移，0 表示以 `Z` 結尾
    pub offset_hours: i32,
    pub include_v_alv: bool,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            primary_url: DEFAULT_PRIMARY_URL.to_string(),
            fallback_url: Some(DEFAULT_FALLBACK_URL.to_string()),
            timeout_seconds: 15,
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            tax_multiplier: 1.255,
            margin: 0.49,
        }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            max_intervals: 12,
            lookback_hours: 2,
            horizon_hours: 72,
            local_timezone: None,
            fallback_offset_hours: 3,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_dir: "public".to_string(),
            file_name: "spotprices.json".to_string(),
            offset_hours: 0,
            include_v_alv: false,
        }
    }
}

impl SourceConfig {
    /// 依嘗試順序列出來源：主要來源在前，備援在後
    pub fn urls(&self) -> Vec<&str> {
        std::iter::once(self.primary_url.as_str())
            .chain(self.fallback_url.as_deref().filter(|url| !url.is_empty()))
            .collect()
    }

    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}

impl ConverterConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，缺少的欄位使用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PRICE_API_URL})，未定義者保留原字串
    fn substitute_env_vars(content: &str) -> String {
        ENV_PLACEHOLDER
            .replace_all(content, |caps: &regex::Captures<'_>| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .to_string()
    }

    pub fn apply_env_overrides(&mut self) -> Result<()> {
        self.apply_overrides_from(|key| std::env::var(key).ok())
    }

    /// 以 `SPOT_*` 變數覆蓋設定，`lookup` 讓測試不必動到行程環境
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SPOT_PRIMARY_URL") {
            self.source.primary_url = url;
        }
        if let Some(url) = lookup("SPOT_FALLBACK_URL") {
            self.source.fallback_url = Some(url).filter(|u| !u.is_empty());
        }
        if let Some(value) = lookup("SPOT_TIMEOUT_SECONDS") {
            self.source.timeout_seconds = parse_override("SPOT_TIMEOUT_SECONDS", &value)?;
        }
        if let Some(value) = lookup("SPOT_TAX_MULTIPLIER") {
            self.pricing.tax_multiplier = parse_override("SPOT_TAX_MULTIPLIER", &value)?;
        }
        if let Some(value) = lookup("SPOT_MARGIN") {
            self.pricing.margin = parse_override("SPOT_MARGIN", &value)?;
        }
        if let Some(value) = lookup("SPOT_MAX_INTERVALS") {
            self.selection.max_intervals = parse_override("SPOT_MAX_INTERVALS", &value)?;
        }
        if let Some(zone) = lookup("SPOT_LOCAL_TIMEZONE") {
            self.selection.local_timezone = Some(zone).filter(|z| !z.is_empty());
        }
        if let Some(dir) = lookup("SPOT_OUTPUT_DIR") {
            self.output.output_dir = dir;
        }
        Ok(())
    }

    pub fn output_path(&self) -> PathBuf {
        Path::new(&self.output.output_dir).join(&self.output.file_name)
    }

    pub fn pricing_policy(&self) -> Result<PricingPolicy> {
        PricingPolicy::from_f64(self.pricing.tax_multiplier, self.pricing.margin).ok_or_else(
            || EtlError::ConfigError {
                message: "pricing constants cannot be represented as decimals".to_string(),
            },
        )
    }

    pub fn timestamp_normalizer(&self) -> Result<TimestampNormalizer> {
        let local_zone = match &self.selection.local_timezone {
            Some(name) => {
                LocalZone::Named(validation::validate_timezone("selection.local_timezone", name)?)
            }
            None => LocalZone::System,
        };

        Ok(TimestampNormalizer::new(
            local_zone,
            offset_from_hours("selection.fallback_offset_hours", self.selection.fallback_offset_hours)?,
            window_from_hours("selection.lookback_hours", self.selection.lookback_hours, 0, 168)?,
            window_from_hours("selection.horizon_hours", self.selection.horizon_hours, 1, 336)?,
        ))
    }

    pub fn output_offset(&self) -> Result<FixedOffset> {
        offset_from_hours("output.offset_hours", self.output.offset_hours)
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_source_url("source.primary_url", &self.source.primary_url)?;
        // 空字串代表停用備援來源
        if let Some(fallback) = self.source.fallback_url.as_deref().filter(|u| !u.is_empty()) {
            validation::validate_source_url("source.fallback_url", fallback)?;
        }
        validation::validate_range("source.timeout_seconds", self.source.timeout_seconds, 1, 300)?;

        validation::validate_range("pricing.tax_multiplier", self.pricing.tax_multiplier, 0.0, 10.0)?;
        validation::validate_range("pricing.margin", self.pricing.margin, -100.0, 100.0)?;
        self.pricing_policy()?;

        validation::validate_at_least(
            "selection.max_intervals",
            self.selection.max_intervals,
            1,
        )?;
        // 也檢查 lookback/horizon 範圍
        self.timestamp_normalizer()?;

        validation::validate_output_dir("output.output_dir", &self.output.output_dir)?;
        validation::validate_file_name("output.file_name", &self.output.file_name)?;
        self.output_offset()?;

        Ok(())
    }
}

impl Validate for ConverterConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

fn parse_override<T: std::str::FromStr>(key: &str, value: &str) -> Result<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| EtlError::InvalidConfigValueError {
            field: key.to_string(),
            value: value.to_string(),
            reason: e.to_string(),
        })
}

fn offset_from_hours(field: &str, hours: i32) -> Result<FixedOffset> {
    validation::validate_range(field, hours, -12, 14)?;
    FixedOffset::east_opt(hours * 3600).ok_or_else(|| EtlError::InvalidConfigValueError {
        field: field.to_string(),
        value: hours.to_string(),
        reason: "Offset out of range".to_string(),
    })
}

/// 先檢查範圍再建立 Duration，避免極端值溢位
fn window_from_hours(field: &str, hours: i64, min: i64, max: i64) -> Result<Duration> {
    validation::validate_range(field, hours, min, max)?;
    Ok(Duration::hours(hours))
}
