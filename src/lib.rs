pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{HttpPriceSource, LocalStorage};
pub use app::pipelines::SpotPricePipeline;
pub use config::ConverterConfig;
pub use crate::core::etl::EtlEngine;
pub use utils::error::{EtlError, Result};
