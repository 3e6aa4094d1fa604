use crate::core::aggregate::build_series;
use crate::core::period;
use crate::core::{AnalyticsSource, ConfigProvider, DataPoint, ReportPipeline, Storage, UsageReport};
use crate::domain::model::{Category, ChartSeries, DateRange, Direction, GraphParams, Period};
use crate::utils::error::{AnalyticsError, Result};
use crate::utils::validation::{parse_date_input, validate_required_field};
use chrono::NaiveDateTime;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};

pub const ARCHIVE_NAME: &str = "usage_report.zip";

/// What a single report covers.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub source_id: String,
    pub period: Period,
    pub category: Category,
    pub range: DateRange,
}

impl ReportRequest {
    /// Resolves the visible range from config, then moves it `steps` periods.
    ///
    /// Custom reports need both dates; other periods start from the range
    /// shown for `now` and ignore any configured dates.
    pub fn from_config<C: ConfigProvider + ?Sized>(
        config: &C,
        now: NaiveDateTime,
        navigation: Option<(Direction, u32)>,
    ) -> Result<Self> {
        let period = Period::parse_or_default(config.period());
        let category = Category::parse_or_default(config.tab());

        let (start_date, end_date) = (config.start_date(), config.end_date());

        let mut range = match period {
            Period::Custom => {
                let start = validate_required_field("start_date", &start_date)?;
                let end = validate_required_field("end_date", &end_date)?;
                DateRange::new(
                    parse_date_input("start_date", start)?,
                    parse_date_input("end_date", end)?,
                )?
            }
            _ => {
                if start_date.is_some() || end_date.is_some() {
                    tracing::debug!("ignoring configured dates for {} period", period);
                }
                period::display_range(now, period)
            }
        };

        if let Some((direction, steps)) = navigation {
            for _ in 0..steps {
                range = period::shift(&range, period, direction)?;
            }
        }

        Ok(Self {
            source_id: config.source_id().to_string(),
            period,
            category,
            range,
        })
    }
}

pub struct AnalyticsReportPipeline<A: AnalyticsSource, S: Storage, C: ConfigProvider> {
    pub(crate) source: A,
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) request: ReportRequest,
}

impl<A: AnalyticsSource, S: Storage, C: ConfigProvider> AnalyticsReportPipeline<A, S, C> {
    pub fn new(source: A, storage: S, config: C, request: ReportRequest) -> Self {
        Self {
            source,
            storage,
            config,
            request,
        }
    }
}

fn series_table(series: &ChartSeries, delimiter: u8) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(Vec::new());
    writer.write_record(["label", "value"])?;
    for (label, value) in series.labels.iter().zip(&series.values) {
        writer.write_record([label.as_str(), value.to_string().as_str()])?;
    }
    writer
        .into_inner()
        .map_err(|e| AnalyticsError::IoError(e.into_error()))
}

fn points_table(points: &[DataPoint]) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for point in points {
        writer.serialize(point)?;
    }
    writer
        .into_inner()
        .map_err(|e| AnalyticsError::IoError(e.into_error()))
}

/// (file name, contents) for each requested format.
pub fn encode_report(report: &UsageReport, formats: &[String]) -> Result<Vec<(String, Vec<u8>)>> {
    let mut files = Vec::new();
    for format in formats {
        match format.as_str() {
            "csv" => {
                files.push(("usage.csv".to_string(), series_table(&report.series, b',')?));
                files.push(("points.csv".to_string(), points_table(&report.points)?));
            }
            "tsv" => files.push(("usage.tsv".to_string(), series_table(&report.series, b'\t')?)),
            "json" => files.push(("report.json".to_string(), serde_json::to_vec_pretty(report)?)),
            other => {
                return Err(AnalyticsError::InvalidConfigValueError {
                    field: "output_formats".to_string(),
                    value: other.to_string(),
                    reason: "Unsupported format".to_string(),
                })
            }
        }
    }
    Ok(files)
}

fn bundle(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in files {
        zip.start_file(name.as_str(), SimpleFileOptions::default())?;
        zip.write_all(data)?;
    }
    Ok(zip.finish()?.into_inner())
}

#[async_trait::async_trait]
impl<A: AnalyticsSource, S: Storage, C: ConfigProvider> ReportPipeline
    for AnalyticsReportPipeline<A, S, C>
{
    async fn extract(&self) -> Result<Vec<DataPoint>> {
        let params = GraphParams::for_range(self.request.period, &self.request.range);
        tracing::debug!("Requesting {:?} for {}", params, self.request.source_id);
        self.source.fetch(&self.request.source_id, &params).await
    }

    async fn transform(&self, points: Vec<DataPoint>) -> Result<UsageReport> {
        let series = build_series(&points, self.request.category);
        Ok(UsageReport {
            source_id: self.request.source_id.clone(),
            period: self.request.period,
            category: self.request.category,
            range_label: period::format_range_label(self.request.period, &self.request.range),
            series,
            points,
        })
    }

    async fn load(&self, report: UsageReport) -> Result<String> {
        let files = encode_report(&report, self.config.output_formats())?;

        if self.config.compression_enabled() {
            tracing::debug!("Bundling {} files into {}", files.len(), ARCHIVE_NAME);
            let archive = bundle(&files)?;
            return self.storage.write_file(ARCHIVE_NAME, &archive).await;
        }

        let mut written = Vec::with_capacity(files.len());
        for (name, data) in &files {
            written.push(self.storage.write_file(name, data).await?);
        }
        Ok(written.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generator::SeriesGenerator;
    use crate::core::source::SyntheticSource;
    use crate::domain::clock::FixedClock;
    use crate::domain::model::Granularity;
    use chrono::NaiveDate;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone, Default)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            self.files.lock().await.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
            self.files.lock().await.insert(path.to_string(), data.to_vec());
            Ok(format!("memory://{}", path))
        }
    }

    struct StaticConfig {
        period: Option<String>,
        start: Option<String>,
        end: Option<String>,
        formats: Vec<String>,
        compress: bool,
    }

    impl StaticConfig {
        fn week() -> Self {
            Self {
                period: Some("week".to_string()),
                start: None,
                end: None,
                formats: vec!["csv".to_string(), "json".to_string()],
                compress: false,
            }
        }
    }

    impl ConfigProvider for StaticConfig {
        fn source_id(&self) -> &str {
            "SN-1"
        }
        fn period(&self) -> Option<&str> {
            self.period.as_deref()
        }
        fn tab(&self) -> &str {
            "grid"
        }
        fn start_date(&self) -> Option<&str> {
            self.start.as_deref()
        }
        fn end_date(&self) -> Option<&str> {
            self.end.as_deref()
        }
        fn seed(&self) -> Option<u64> {
            Some(3)
        }
        fn output_path(&self) -> &str {
            "./unused"
        }
        fn output_formats(&self) -> &[String] {
            &self.formats
        }
        fn compression_enabled(&self) -> bool {
            self.compress
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap()
    }

    fn pipeline(
        config: StaticConfig,
        storage: MockStorage,
    ) -> AnalyticsReportPipeline<SyntheticSource<FixedClock>, MockStorage, StaticConfig> {
        let request = ReportRequest::from_config(&config, now(), None).unwrap();
        let source =
            SyntheticSource::with_generator(FixedClock(now()), SeriesGenerator::with_seed(3));
        AnalyticsReportPipeline::new(source, storage, config, request)
    }

    #[test]
    fn test_request_custom_requires_both_dates() {
        let config = StaticConfig {
            period: Some("custom".to_string()),
            start: Some("2024-01-01".to_string()),
            ..StaticConfig::week()
        };
        let err = ReportRequest::from_config(&config, now(), None).unwrap_err();
        assert!(matches!(err, AnalyticsError::MissingConfigError { ref field } if field == "end_date"));
    }

    #[test]
    fn test_request_navigation_moves_range() {
        let config = StaticConfig {
            period: Some("day".to_string()),
            ..StaticConfig::week()
        };
        let request =
            ReportRequest::from_config(&config, now(), Some((Direction::Previous, 3))).unwrap();
        assert_eq!(
            request.range.start(),
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap().and_hms_opt(0, 0, 0).unwrap()
        );
        assert_eq!(request.category, Category::Grid);
    }

    #[test]
    fn test_request_navigation_past_calendar_end_fails() {
        let config = StaticConfig {
            period: Some("custom".to_string()),
            start: Some("2024-01-01".to_string()),
            end: Some("+262000-01-01".to_string()),
            ..StaticConfig::week()
        };
        let err =
            ReportRequest::from_config(&config, now(), Some((Direction::Next, 1))).unwrap_err();
        assert!(matches!(err, AnalyticsError::DateOutOfRange { .. }));
    }

    #[test]
    fn test_request_unknown_period_is_week() {
        let config = StaticConfig {
            period: Some("fortnight".to_string()),
            ..StaticConfig::week()
        };
        let request = ReportRequest::from_config(&config, now(), None).unwrap();
        assert_eq!(request.period, Period::Week);
    }

    #[tokio::test]
    async fn test_extract_and_transform_grid_report() {
        let pipeline = pipeline(StaticConfig::week(), MockStorage::default());

        let points = pipeline.extract().await.unwrap();
        assert_eq!(points.len(), 7);
        assert!(points.iter().all(|p| p.granularity == Granularity::Day));

        let expected: Vec<f64> = points.iter().map(|p| p.grid_imported).collect();
        let report = pipeline.transform(points).await.unwrap();
        assert_eq!(report.series.values, expected);
        assert_eq!(report.range_label, "Jan 3 - 10");
    }

    #[tokio::test]
    async fn test_load_writes_each_format() {
        let storage = MockStorage::default();
        let pipeline = pipeline(StaticConfig::week(), storage.clone());

        let points = pipeline.extract().await.unwrap();
        let report = pipeline.transform(points).await.unwrap();
        let output = pipeline.load(report).await.unwrap();

        assert!(output.contains("memory://usage.csv"));
        let usage = String::from_utf8(storage.get_file("usage.csv").await.unwrap()).unwrap();
        assert!(usage.starts_with("label,value\nJan 4,"));
        assert_eq!(usage.lines().count(), 8);

        let points_csv = String::from_utf8(storage.get_file("points.csv").await.unwrap()).unwrap();
        assert!(points_csv.starts_with("dateTime,scale,serialNumber,batteryToHome"));

        let json = storage.get_file("report.json").await.unwrap();
        let parsed: serde_json::Value = serde_json::from_slice(&json).unwrap();
        assert_eq!(parsed["category"], "grid");
        assert_eq!(parsed["points"].as_array().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_load_bundles_when_compressed() {
        let storage = MockStorage::default();
        let config = StaticConfig {
            formats: vec!["tsv".to_string(), "json".to_string()],
            compress: true,
            ..StaticConfig::week()
        };
        let pipeline = pipeline(config, storage.clone());

        let points = pipeline.extract().await.unwrap();
        let report = pipeline.transform(points).await.unwrap();
        let output = pipeline.load(report).await.unwrap();
        assert_eq!(output, "memory://usage_report.zip");

        let archive_bytes = storage.get_file(ARCHIVE_NAME).await.unwrap();
        let mut archive = zip::ZipArchive::new(std::io::Cursor::new(archive_bytes)).unwrap();
        let names: Vec<String> = (0..archive.len())
            .map(|i| archive.by_index(i).unwrap().name().to_string())
            .collect();
        assert_eq!(names, vec!["usage.tsv", "report.json"]);
        assert!(storage.get_file("usage.tsv").await.is_none());
    }
}
