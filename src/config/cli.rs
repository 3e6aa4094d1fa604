use crate::config::validate_provider;
use crate::core::dashboard::DEFAULT_SOURCE_ID;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "energy-insights")]
#[command(about = "Energy usage analytics for a home inverter")]
pub struct CliConfig {
    /// day, week, month or custom
    #[arg(long, default_value = "week")]
    pub period: String,

    /// home, grid, solar or battery
    #[arg(long, default_value = "home")]
    pub tab: String,

    /// Custom range start (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
    #[arg(long)]
    pub start: Option<String>,

    /// Custom range end
    #[arg(long)]
    pub end: Option<String>,

    #[arg(long, default_value = DEFAULT_SOURCE_ID)]
    pub source_id: String,

    /// Move the range: previous or next
    #[arg(long)]
    pub navigate: Option<String>,

    /// How many periods to move with --navigate
    #[arg(long, default_value = "1")]
    pub steps: u32,

    /// Seed for reproducible synthetic data
    #[arg(long)]
    pub seed: Option<u64>,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "csv,json")]
    pub formats: Vec<String>,

    /// Bundle exports into one zip archive
    #[arg(long)]
    pub compress: bool,

    /// Read report settings from a TOML file instead of flags
    #[arg(long)]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Log phase timings and memory usage")]
    pub monitor: bool,
}

impl ConfigProvider for CliConfig {
    fn source_id(&self) -> &str {
        &self.source_id
    }

    fn period(&self) -> Option<&str> {
        Some(&self.period)
    }

    fn tab(&self) -> &str {
        &self.tab
    }

    fn start_date(&self) -> Option<&str> {
        self.start.as_deref()
    }

    fn end_date(&self) -> Option<&str> {
        self.end.as_deref()
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[String] {
        &self.formats
    }

    fn compression_enabled(&self) -> bool {
        self.compress
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)?;
        if let Some(direction) = &self.navigate {
            direction.parse::<crate::domain::model::Direction>()?;
        }
        Ok(())
    }
}
