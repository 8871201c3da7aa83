#[cfg(feature = "cli")]
pub mod cli;
pub mod converter;

pub use converter::{
    ConverterConfig, OutputConfig, PricingConfig, SelectionConfig, SourceConfig,
    DEFAULT_FALLBACK_URL, DEFAULT_PRIMARY_URL,
};
