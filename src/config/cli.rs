use crate::config::ConverterConfig;
use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "spotprice-etl")]
#[command(about = "Fetch spot prices and write the upcoming intervals as JSON")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, env = "SPOT_CONFIG")]
    pub config: Option<String>,

    #[arg(long)]
    pub primary_url: Option<String>,

    #[arg(long, conflicts_with = "no_fallback")]
    pub fallback_url: Option<String>,

    /// Only query the primary source
    #[arg(long)]
    pub no_fallback: bool,

    #[arg(long)]
    pub output_dir: Option<String>,

    #[arg(long)]
    pub max_intervals: Option<usize>,

    /// Fetch and transform, print the document instead of writing it
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

impl CliArgs {
    /// 載入設定：預設值 -> TOML -> 環境變數 -> 命令列
    pub fn load_config(&self) -> crate::Result<ConverterConfig> {
        let mut config = match &self.config {
            Some(path) => ConverterConfig::from_file(path)?,
            None => ConverterConfig::default(),
        };

        config.apply_env_overrides()?;
        self.apply_to(&mut config);
        Ok(config)
    }

    pub fn apply_to(&self, config: &mut ConverterConfig) {
        if let Some(url) = &self.primary_url {
            config.source.primary_url = url.clone();
        }
        if let Some(url) = &self.fallback_url {
            config.source.fallback_url = Some(url.clone());
        }
        if self.no_fallback {
            config.source.fallback_url = None;
        }
        if let Some(dir) = &self.output_dir {
            config.output.output_dir = dir.clone();
        }
        if let Some(max) = self.max_intervals {
            config.selection.max_intervals = max;
        }
    }
}
