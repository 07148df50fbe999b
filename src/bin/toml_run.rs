use anyhow::Context;
use clap::Parser;
use fuelrun::config::toml_config::FuelTomlConfig;
use fuelrun::utils::{logger, validation::Validate};
use fuelrun::{FuelPipeline, LocalStorage, SnapshotArchive, SnapshotEngine};

#[derive(Parser)]
#[command(name = "toml-run")]
#[command(about = "Fuel price snapshot tool driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "fuelrun.toml")]
    config: String,

    /// Fetch fresh data instead of reloading the last snapshot
    #[arg(long)]
    update: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Dry run - show what would be processed without executing
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    logger::init_cli_logger(args.verbose);

    tracing::info!("🚀 Starting TOML-driven fuel snapshot tool");
    tracing::info!("📁 Loading configuration from: {}", args.config);

    // 載入 TOML 配置
    let config = FuelTomlConfig::from_file(&args.config)
        .with_context(|| format!("failed to load config file '{}'", args.config))?;

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        anyhow::bail!(e.user_friendly_message());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    // 顯示配置摘要
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - No actual processing will occur");
        perform_dry_run(&config, &args);
        return Ok(());
    }

    // 決定監控設定
    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output.data_dir.clone());

    if args.update {
        let pipeline = FuelPipeline::new(storage, config);
        let engine = SnapshotEngine::new_with_monitoring(pipeline, monitor_enabled);

        let output_path = engine.run().await.map_err(|e| {
            tracing::error!(
                "❌ Snapshot run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            anyhow::anyhow!(e.user_friendly_message())
        })?;

        println!("✅ Snapshot run completed successfully!");
        println!("📁 Snapshot saved to: {}", output_path);
    } else {
        let archive = SnapshotArchive::new(storage);

        let (dir, snapshot) = archive.read_latest().await.map_err(|e| {
            tracing::error!("❌ Snapshot reload failed: {}", e);
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            anyhow::anyhow!(e.user_friendly_message())
        })?;

        println!("✅ Reloaded snapshot '{}'", dir);
        println!(
            "📊 {} stations, {} prices, {} combined rows",
            snapshot.stations.len(),
            snapshot.prices.len(),
            snapshot.combined.len()
        );
    }

    Ok(())
}

fn display_config_summary(config: &FuelTomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!(
        "  Pipeline: {} v{}",
        config.pipeline.name, config.pipeline.version
    );
    println!("  Token endpoint: {}", config.api.token_endpoint);
    println!("  Prices endpoint: {}", config.api.prices_endpoint);
    println!("  States: {}", config.states());
    println!("  Data dir: {}", config.output.data_dir);
    println!(
        "  Mode: {}",
        if args.update { "update" } else { "reload" }
    );

    if let Some(timeout) = config.api.timeout_seconds {
        println!("  Request timeout: {}s", timeout);
    }

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &FuelTomlConfig, args: &Args) {
    println!("🔍 Dry Run Analysis:");
    println!();

    if args.update {
        println!("📡 Data Source Analysis:");
        println!("  1. GET {} (grant_type=client_credentials)", config.api.token_endpoint);
        println!("  2. GET {} (states={})", config.api.prices_endpoint, config.states());

        let auth_configured = config
            .auth
            .as_ref()
            .map(|a| a.authorization.is_some())
            .unwrap_or(false);
        println!(
            "  Credentials: {}",
            if auth_configured {
                "✅ authorization configured"
            } else {
                "❌ authorization missing - the run would fail"
            }
        );

        println!();
        println!("💾 Output Configuration:");
        println!(
            "  Would write {}/backup_<YYYYMMDD>/{{stations,prices,combined}}.csv",
            config.output.data_dir
        );
    } else {
        println!("📂 Reload Analysis:");
        println!(
            "  Would read the lexicographically-last backup_* directory under '{}'",
            config.output.data_dir
        );
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
