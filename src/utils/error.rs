use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("No inverter serial number available")]
    MissingSourceId,

    #[error("Invalid date for {field}: {value}")]
    InvalidDate { field: String, value: String },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Date range {start} .. {end} falls outside the supported calendar")]
    DateOutOfRange { start: String, end: String },

    #[error("Analytics source failed: {message}")]
    SourceError { message: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Source,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AnalyticsError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingSourceId
            | Self::InvalidDate { .. }
            | Self::InvalidDateRange { .. }
            | Self::DateOutOfRange { .. } => ErrorCategory::Input,
            Self::ConfigValidationError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            Self::SourceError { .. } => ErrorCategory::Source,
            Self::ZipError(_) | Self::CsvError(_) | Self::IoError(_) | Self::SerializationError(_) => {
                ErrorCategory::Output
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SourceError { .. } => ErrorSeverity::Medium,
            Self::MissingSourceId
            | Self::InvalidDate { .. }
            | Self::InvalidDateRange { .. }
            | Self::DateOutOfRange { .. }
            | Self::ConfigValidationError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorSeverity::High,
            Self::ZipError(_) | Self::CsvError(_) | Self::IoError(_) | Self::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    /// Whether a caller may reset its view and carry on instead of aborting.
    pub fn is_recoverable(&self) -> bool {
        self.severity() <= ErrorSeverity::Medium
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingSourceId => "No inverter is selected, nothing to chart".to_string(),
            Self::InvalidDate { field, value } => {
                format!("Could not read '{}' as a date for {}", value, field)
            }
            Self::InvalidDateRange { start, end } => {
                format!("The selected range ends ({}) before it starts ({})", end, start)
            }
            Self::DateOutOfRange { start, end } => {
                format!("The range {} - {} cannot be moved any further", start, end)
            }
            Self::SourceError { message } => format!("Could not load usage data: {}", message),
            Self::ConfigValidationError { field, message } => {
                format!("Configuration problem in {}: {}", field, message)
            }
            Self::MissingConfigError { field } => format!("Configuration is missing {}", field),
            Self::InvalidConfigValueError { field, value, reason } => {
                format!("'{}' is not valid for {}: {}", value, field, reason)
            }
            other => format!("Failed to write the report: {}", other),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::MissingSourceId => "Pass --source-id or set dashboard.source_id in the config",
            Self::InvalidDate { .. } => "Use YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS",
            Self::InvalidDateRange { .. } => "Pick an end date on or after the start date",
            Self::DateOutOfRange { .. } => "Pick dates closer to the present",
            Self::SourceError { .. } => "Try again; the chart was reset to empty",
            Self::ConfigValidationError { .. }
            | Self::MissingConfigError { .. }
            | Self::InvalidConfigValueError { .. } => "Check the configuration file and flags",
            Self::ZipError(_) | Self::CsvError(_) | Self::IoError(_) | Self::SerializationError(_) => {
                "Check that the output path exists and is writable"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
