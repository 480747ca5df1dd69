use clap::Parser;
use competitor_price_monitor::utils::{logger, validation::Validate};
use competitor_price_monitor::{
    CliConfig, HttpFetcher, LocalStorage, MonitorConfig, MonitorError, PriceMonitor, ReportWriter,
    TracingReporter,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.load_monitor_config().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => exit_with(&e),
    };

    tracing::info!("✅ Configuration '{}' loaded and validated", config.name());

    for warning in config.url_warnings() {
        tracing::warn!("⚠️ {} (will be reported as FETCH_FAILED)", warning);
    }

    let output_path = config.output_path(chrono::Local::now());
    let format = config.output_format();

    if cli.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No pages will be fetched");
        print_plan(&config, &output_path);
        return Ok(());
    }

    let fetcher = HttpFetcher::new(config.fetch_settings())?;
    let monitor = PriceMonitor::new(fetcher, TracingReporter);
    let writer = ReportWriter::new(LocalStorage::new(), format);

    match monitor.run(&config, &writer, &output_path).await {
        Ok(report) => {
            let summary = report.summary();
            println!("✅ Price report generated successfully: {}", output_path.display());
            println!(
                "   {} rows: {} ok, {} fetch failed, {} parse failed",
                summary.total(),
                summary.ok,
                summary.fetch_failed,
                summary.parse_failed
            );
            Ok(())
        }
        Err(e) => exit_with(&e),
    }
}

fn exit_with(e: &MonitorError) -> ! {
    tracing::error!("❌ {}", e);
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 {}", e.recovery_suggestion());
    std::process::exit(e.exit_code());
}

fn print_plan(config: &MonitorConfig, output_path: &std::path::Path) {
    println!("📋 {}", config.name());
    println!(
        "   {} products, {} competitor pages, timeout {}s",
        config.products.len(),
        config.competitor_count(),
        config.timeout_seconds()
    );

    for product in &config.products {
        println!("   • {}", product.name);
        for competitor in &product.competitors {
            let selectors = config.selectors_for(competitor);
            println!(
                "       - {} -> {} (price: '{}')",
                competitor.name, competitor.url, selectors.price
            );
        }
    }

    println!(
        "   Report: {} ({})",
        output_path.display(),
        config.output_format()
    );
}
