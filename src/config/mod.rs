#[cfg(feature = "cli")]
pub mod cli;
pub mod storage;
pub mod toml_config;

pub use storage::LocalStorage;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::core::ConfigProvider;
use crate::domain::model::Period;
use crate::utils::error::Result;
use crate::utils::validation;

pub const OUTPUT_FORMATS: [&str; 3] = ["csv", "tsv", "json"];

/// Checks shared by every config provider.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validation::validate_non_empty_string("source_id", config.source_id())?;
    validation::validate_path("output_path", config.output_path())?;
    validation::validate_one_of("output_formats", config.output_formats(), &OUTPUT_FORMATS)?;

    // Dates only shape custom reports; other periods ignore them
    if Period::parse_or_default(config.period()) != Period::Custom {
        return Ok(());
    }

    let start = config
        .start_date()
        .map(|v| validation::parse_date_input("start_date", v))
        .transpose()?;
    let end = config
        .end_date()
        .map(|v| validation::parse_date_input("end_date", v))
        .transpose()?;
    if let (Some(start), Some(end)) = (start, end) {
        validation::validate_date_order(start, end)?;
    }

    Ok(())
}
