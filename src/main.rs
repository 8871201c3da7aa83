use clap::Parser;
use spotprice_etl::utils::{logger, validation::Validate};
use spotprice_etl::{CliArgs, EtlEngine, EtlError, HttpPriceSource, LocalStorage, SpotPricePipeline};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose, args.log_json);

    tracing::info!("Starting spotprice-etl");

    let config = match args.load_config() {
        Ok(config) => config,
        Err(e) => fail(&e),
    };

    if args.verbose {
        tracing::debug!("Resolved config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        fail(&e);
    }

    let storage = LocalStorage::new(config.output.output_dir.clone());
    let source = HttpPriceSource::new(config.source.timeout());
    let pipeline = SpotPricePipeline::new(storage, source, config);
    let engine = EtlEngine::new(pipeline);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - output file will not be written");
        match engine.preview().await {
            Ok(document) => println!("{}", serde_json::to_string_pretty(&document)?),
            Err(e) => fail(&e),
        }
        return Ok(());
    }

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Spot prices updated");
            println!("✅ Spot prices written to: {}", output_path);
        }
        Err(e) => fail(&e),
    }

    Ok(())
}

/// 記錄錯誤並以非零退出碼結束，既有輸出檔保持不變
fn fail(e: &EtlError) -> ! {
    tracing::error!(
        "❌ Conversion failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());

    std::process::exit(e.exit_code().max(1));
}
