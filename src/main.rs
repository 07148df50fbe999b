use clap::Parser;
use fuelrun::utils::error::FuelError;
use fuelrun::utils::{logger, validation::Validate};
use fuelrun::{CliConfig, FuelPipeline, LocalStorage, SnapshotArchive, SnapshotEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("🚗 FuelRun - NSW fuel price snapshots");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 憑證允許從環境變數帶入
    config.resolve_env();

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let monitor_enabled = config.monitor;
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.data_dir.clone());

    if config.update {
        tracing::info!("⬇️ Downloading and processing latest data");

        // 創建管道與引擎並運行
        let pipeline = FuelPipeline::new(storage, config);
        let engine = SnapshotEngine::new_with_monitoring(pipeline, monitor_enabled);

        match engine.run().await {
            Ok(output_path) => {
                tracing::info!("✅ Snapshot run completed successfully!");
                tracing::info!("📁 Snapshot saved to: {}", output_path);
                println!("✅ Snapshot run completed successfully!");
                println!("📁 Snapshot saved to: {}", output_path);
            }
            Err(e) => handle_failure(&e),
        }
    } else {
        // 預設模式：讀回最近一次快照
        let archive = SnapshotArchive::new(storage);

        match archive.read_latest().await {
            Ok((dir, snapshot)) => {
                let date = dir.strip_prefix("backup_").unwrap_or(&dir);
                tracing::info!("📂 Reloaded snapshot from {}", date);
                println!("✅ Reloaded snapshot from {}", date);
                println!(
                    "📊 {} stations, {} prices, {} combined rows",
                    snapshot.stations.len(),
                    snapshot.prices.len(),
                    snapshot.combined.len()
                );
            }
            Err(e) => handle_failure(&e),
        }
    }

    Ok(())
}

fn handle_failure(e: &FuelError) {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ FuelRun failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

    // 輸出用戶友好的錯誤信息
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    // 根據錯誤嚴重程度決定退出碼
    let exit_code = match e.severity() {
        fuelrun::utils::error::ErrorSeverity::Low => 0, // 警告，但成功
        fuelrun::utils::error::ErrorSeverity::Medium => 2, // 重試錯誤
        fuelrun::utils::error::ErrorSeverity::High => 1, // 處理錯誤
        fuelrun::utils::error::ErrorSeverity::Critical => 3, // 系統錯誤
    };

    if exit_code > 0 {
        std::process::exit(exit_code);
    }
}
