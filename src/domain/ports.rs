use crate::domain::model::{DataPoint, GraphParams, UsageReport};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;

pub trait Storage: Send + Sync {
    /// Writes `data` under `path` and returns where it ended up.
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Report settings, wherever they were read from.
pub trait ConfigProvider: Send + Sync {
    fn source_id(&self) -> &str;
    fn period(&self) -> Option<&str>;
    fn tab(&self) -> &str;
    fn start_date(&self) -> Option<&str>;
    fn end_date(&self) -> Option<&str>;
    fn seed(&self) -> Option<u64>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn compression_enabled(&self) -> bool;
}

/// Local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Where energy-flow data comes from.
#[async_trait]
pub trait AnalyticsSource: Send + Sync {
    async fn fetch(&self, source_id: &str, params: &GraphParams) -> Result<Vec<DataPoint>>;
}

#[async_trait]
pub trait ReportPipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<DataPoint>>;
    async fn transform(&self, points: Vec<DataPoint>) -> Result<UsageReport>;
    async fn load(&self, report: UsageReport) -> Result<String>;
}
