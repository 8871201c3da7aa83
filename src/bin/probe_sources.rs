use anyhow::{Context, Result};
use clap::Parser;
use spotprice_etl::domain::ports::PriceSource;
use spotprice_etl::domain::services::fields::{find_interval_key, resolve_intervals};
use spotprice_etl::utils::logger;
use spotprice_etl::{ConverterConfig, HttpPriceSource};

#[derive(Parser)]
#[command(name = "probe-sources")]
#[command(about = "Report which schema variant each configured price source currently returns")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long)]
    config: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logger::init_cli_logger(args.verbose, false);

    let mut config = match &args.config {
        Some(path) => ConverterConfig::from_file(path)
            .with_context(|| format!("Failed to load config file '{}'", path))?,
        None => ConverterConfig::default(),
    };
    config.apply_env_overrides()?;

    let source = HttpPriceSource::new(config.source.timeout());

    println!("🔎 Probing {} source(s)", config.source.urls().len());
    for url in config.source.urls() {
        println!("- {}", url);

        let Some(json_data) = source.fetch_json(url).await else {
            println!("    ❌ unavailable");
            continue;
        };

        match (find_interval_key(&json_data), resolve_intervals(&json_data)) {
            (Some(key), Ok(records)) => {
                println!("    ✅ '{}' with {} interval(s)", key, records.len());
                let first = &records[0];
                println!(
                    "    time key: {}, value key: {}",
                    first.time_field().map(|(k, _)| k).unwrap_or("<none>"),
                    first.value_field().map(|(k, _)| k).unwrap_or("<none>")
                );
            }
            (_, Err(e)) => println!("    ⚠️ {}", e),
            (None, Ok(_)) => println!("    ⚠️ no interval key matched"),
        }
    }

    Ok(())
}
