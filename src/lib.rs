pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{toml_config::TomlConfig, LocalStorage};

pub use app::pipelines::{AnalyticsReportPipeline, ReportRequest};
pub use core::{
    dashboard::{Dashboard, DashboardObserver, DashboardSnapshot},
    engine::ReportEngine,
    generator::SeriesGenerator,
    source::SyntheticSource,
};
pub use domain::clock::{FixedClock, SystemClock};
pub use domain::model::{
    Category, ChartSeries, DataPoint, DateRange, Direction, Granularity, GraphParams, Period,
    ResolvedScale, StepUnit, UsageReport,
};
pub use utils::error::{AnalyticsError, Result};
