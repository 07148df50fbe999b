use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct SnapshotEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> SnapshotEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(false),
        }
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("🚀 Starting fuel price snapshot run");

        // Extract
        tracing::info!("📥 Extracting data from NSW API...");
        let raw = self.pipeline.extract().await?;
        self.monitor.log_stats("Extract");

        // Transform
        tracing::info!("🔄 Building station, price and combined tables...");
        let snapshot = self.pipeline.transform(raw).await?;
        tracing::info!(
            "🔄 Tables ready: {} stations, {} prices, {} combined rows",
            snapshot.stations.len(),
            snapshot.prices.len(),
            snapshot.combined.len()
        );
        self.monitor.log_stats("Transform");

        // Load
        tracing::info!("💾 Exporting snapshot CSVs...");
        let output_path = self.pipeline.load(snapshot).await?;
        tracing::info!("💾 Snapshot saved to: {}", output_path);
        self.monitor.log_stats("Load");

        self.monitor.log_final_stats();
        Ok(output_path)
    }
}
