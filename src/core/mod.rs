pub mod aggregate;
pub mod dashboard;
pub mod engine;
pub mod generator;
pub mod period;
pub mod source;

pub use crate::domain::model::{ChartSeries, DataPoint, UsageReport};
pub use crate::domain::ports::{AnalyticsSource, Clock, ConfigProvider, ReportPipeline, Storage};
pub use crate::utils::error::Result;
