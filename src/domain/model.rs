use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::utils::error::{AnalyticsError, Result};

/// Symbolic date-range selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Day,
    #[default]
    Week,
    Month,
    Custom,
}

impl Period {
    pub const ALL: [Self; 4] = [Self::Day, Self::Week, Self::Month, Self::Custom];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Custom => "custom",
        }
    }

    /// Missing or unrecognized values resolve as `Week`.
    pub fn parse_or_default(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = AnalyticsError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "custom" => Ok(Self::Custom),
            other => Err(AnalyticsError::InvalidConfigValueError {
                field: "period".to_string(),
                value: other.to_string(),
                reason: "Expected one of day, week, month, custom".to_string(),
            }),
        }
    }
}

/// Size of one generated time bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Granularity {
    Hour,
    Day,
    Month,
}

impl Granularity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hour => "HOUR",
            Self::Day => "DAY",
            Self::Month => "MONTH",
        }
    }
}

impl Display for Granularity {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepUnit {
    Hour,
    Day,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Previous,
    Next,
}

impl Direction {
    pub const fn sign(self) -> i32 {
        match self {
            Self::Previous => -1,
            Self::Next => 1,
        }
    }
}

impl FromStr for Direction {
    type Err = AnalyticsError;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "previous" | "prev" => Ok(Self::Previous),
            "next" => Ok(Self::Next),
            other => Err(AnalyticsError::InvalidConfigValueError {
                field: "navigate".to_string(),
                value: other.to_string(),
                reason: "Expected previous or next".to_string(),
            }),
        }
    }
}

/// Display grouping that selects which energy flows are charted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Home,
    Grid,
    Solar,
    Battery,
}

impl Category {
    pub const ALL: [Self; 4] = [Self::Home, Self::Grid, Self::Solar, Self::Battery];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Grid => "grid",
            Self::Solar => "solar",
            Self::Battery => "battery",
        }
    }

    /// Unknown tabs chart the home total.
    pub fn parse_or_default(value: &str) -> Self {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(value))
            .unwrap_or_default()
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive pair of local wall-clock timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl DateRange {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self> {
        crate::utils::validation::validate_date_order(start, end)?;
        Ok(Self { start, end })
    }

    /// Callers guarantee `start <= end`.
    pub(crate) fn from_ordered(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        debug_assert!(start <= end, "range out of order: {start} > {end}");
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }
}

/// Output of period resolution for data generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedScale {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub granularity: Granularity,
    pub step_unit: StepUnit,
    pub step_count: u32,
}

/// One time bucket's energy flows, in kWh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataPoint {
    #[serde(rename = "dateTime")]
    pub timestamp: NaiveDateTime,
    #[serde(rename = "scale")]
    pub granularity: Granularity,
    #[serde(rename = "serialNumber")]
    pub source_id: String,
    pub battery_to_home: f64,
    pub solar_to_battery: f64,
    pub grid_to_battery: f64,
    pub gen_to_battery: f64,
    pub solar_to_home: f64,
    pub grid_to_home: f64,
    pub generator_to_home: f64,
    pub grid_imported: f64,
    pub battery_exported: f64,
    pub solar_exported: f64,
}

impl DataPoint {
    /// All flows, in declaration order.
    pub fn flows(&self) -> [f64; 10] {
        [
            self.battery_to_home,
            self.solar_to_battery,
            self.grid_to_battery,
            self.gen_to_battery,
            self.solar_to_home,
            self.grid_to_home,
            self.generator_to_home,
            self.grid_imported,
            self.battery_exported,
            self.solar_exported,
        ]
    }
}

/// Query sent to an analytics source. Bounds only travel for `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphParams {
    #[serde(rename = "timeScale")]
    pub period: Period,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

impl GraphParams {
    pub fn for_range(period: Period, range: &DateRange) -> Self {
        match period {
            Period::Custom => Self {
                period,
                start_date: Some(range.start()),
                end_date: Some(range.end()),
            },
            _ => Self {
                period,
                start_date: None,
                end_date: None,
            },
        }
    }
}

/// Chart-ready series: one label and one value per data point.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
    pub total: f64,
}

impl ChartSeries {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Everything a report export writes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageReport {
    pub source_id: String,
    pub period: Period,
    pub category: Category,
    pub range_label: String,
    pub series: ChartSeries,
    pub points: Vec<DataPoint>,
}
