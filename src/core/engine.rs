use crate::core::ReportPipeline;
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;

/// Runs a report pipeline stage by stage.
pub struct ReportEngine<P: ReportPipeline> {
    pipeline: P,
    monitor_enabled: bool,
}

impl<P: ReportPipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor_enabled,
        }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<String> {
        let mut monitor = RunMonitor::new(self.monitor_enabled);
        tracing::info!("Starting usage report...");

        let points = self.pipeline.extract().await?;
        tracing::info!("Fetched {} data points", points.len());
        monitor.mark("extract");

        let report = self.pipeline.transform(points).await?;
        tracing::info!(
            "Aggregated {} for {} (total {} kWh)",
            report.category,
            report.range_label,
            report.series.total
        );
        monitor.mark("transform");

        let output_path = self.pipeline.load(report).await?;
        tracing::info!("Report saved to: {}", output_path);
        monitor.mark("load");

        monitor.log_final_stats();
        Ok(output_path)
    }
}
