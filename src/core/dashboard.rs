//! Dashboard state: selected period and tab, the visible date range and the
//! chart derived from them.
//!
//! Every transition recomputes the range label and the chart top-down and
//! then notifies observers, so a newer selection always replaces whatever
//! the previous one produced.

use chrono::NaiveDateTime;

use crate::core::aggregate::build_series;
use crate::core::period;
use crate::domain::model::{Category, ChartSeries, DateRange, Direction, GraphParams, Period};
use crate::domain::ports::{AnalyticsSource, Clock};
use crate::utils::error::Result;

pub const DEFAULT_SOURCE_ID: &str = "MOCK_INVERTER_SN";

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSnapshot {
    pub period: Period,
    pub category: Category,
    pub range: Option<DateRange>,
    pub range_label: String,
    pub series: ChartSeries,
}

pub trait DashboardObserver: Send + Sync {
    fn on_change(&self, snapshot: &DashboardSnapshot);
}

pub struct Dashboard<S: AnalyticsSource, C: Clock> {
    source: S,
    clock: C,
    source_id: String,
    period: Period,
    category: Category,
    range: Option<DateRange>,
    range_label: String,
    series: ChartSeries,
    observers: Vec<Box<dyn DashboardObserver>>,
}

impl<S: AnalyticsSource, C: Clock> Dashboard<S, C> {
    /// Starts on the week view for the placeholder inverter. Nothing is
    /// fetched until the first transition or [`Dashboard::refresh`]; use
    /// [`Dashboard::open`] to start with a loaded chart.
    pub fn new(source: S, clock: C) -> Self {
        let range = period::display_range(clock.now(), Period::Week);
        Self {
            source,
            clock,
            source_id: DEFAULT_SOURCE_ID.to_string(),
            period: Period::Week,
            category: Category::Home,
            range_label: period::format_range_label(Period::Week, &range),
            range: Some(range),
            series: ChartSeries::empty(),
            observers: Vec::new(),
        }
    }

    /// Builds the dashboard for `source_id` and fetches the initial week.
    pub async fn open(source: S, clock: C, source_id: impl Into<String>) -> Self {
        let mut dashboard = Self::new(source, clock).with_source_id(source_id);
        dashboard.refresh().await;
        dashboard
    }

    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = source_id.into();
        self
    }

    pub fn subscribe(&mut self, observer: Box<dyn DashboardObserver>) {
        self.observers.push(observer);
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn range(&self) -> Option<&DateRange> {
        self.range.as_ref()
    }

    pub fn range_label(&self) -> &str {
        &self.range_label
    }

    pub fn series(&self) -> &ChartSeries {
        &self.series
    }

    pub fn total(&self) -> f64 {
        self.series.total
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            period: self.period,
            category: self.category,
            range: self.range,
            range_label: self.range_label.clone(),
            series: self.series.clone(),
        }
    }

    /// Non-custom periods reset the range; `Custom` keeps the current one.
    pub async fn select_period(&mut self, period: Period) {
        self.period = period;
        if period != Period::Custom {
            self.range = Some(period::display_range(self.clock.now(), period));
        }
        self.refresh().await;
    }

    pub async fn select_category(&mut self, category: Category) {
        self.category = category;
        self.refresh().await;
    }

    pub async fn set_source_id(&mut self, source_id: impl Into<String>) {
        self.source_id = source_id.into();
        self.refresh().await;
    }

    /// Moves the range one period. The range is left alone if the move
    /// would leave the calendar.
    pub async fn navigate(&mut self, direction: Direction) -> Result<()> {
        let Some(range) = self.range else {
            tracing::debug!("no date range to navigate");
            return Ok(());
        };
        self.range = Some(period::shift(&range, self.period, direction)?);
        self.refresh().await;
        Ok(())
    }

    pub async fn previous_period(&mut self) -> Result<()> {
        self.navigate(Direction::Previous).await
    }

    pub async fn next_period(&mut self) -> Result<()> {
        self.navigate(Direction::Next).await
    }

    pub async fn edit_start(&mut self, start: NaiveDateTime) {
        self.range = Some(match &self.range {
            Some(range) => period::on_start_edited(range, start),
            None => DateRange::from_ordered(start, start),
        });
        self.refresh().await;
    }

    pub async fn edit_end(&mut self, end: NaiveDateTime) {
        self.range = Some(match &self.range {
            Some(range) => period::on_end_edited(range, end),
            None => DateRange::from_ordered(end, end),
        });
        self.refresh().await;
    }

    /// Recomputes label and chart, then notifies observers.
    ///
    /// Skips fetching while there is no range or no source id. A failed
    /// fetch leaves an empty chart rather than the previous one.
    pub async fn refresh(&mut self) {
        let Some(range) = self.range else {
            tracing::debug!("no date range, skipping refresh");
            return;
        };
        self.range_label = period::format_range_label(self.period, &range);

        if self.source_id.trim().is_empty() {
            tracing::debug!("no source id, skipping fetch");
            self.notify();
            return;
        }

        let params = GraphParams::for_range(self.period, &range);
        self.series = match self.source.fetch(&self.source_id, &params).await {
            Ok(points) => build_series(&points, self.category),
            Err(e) => {
                if e.is_recoverable() {
                    tracing::warn!(
                        error = %e,
                        category = ?e.category(),
                        "fetching graph data failed, resetting chart"
                    );
                } else {
                    tracing::error!(
                        error = %e,
                        category = ?e.category(),
                        "graph request rejected, resetting chart"
                    );
                }
                ChartSeries::empty()
            }
        };

        tracing::debug!(
            period = %self.period,
            category = %self.category,
            points = self.series.values.len(),
            total = self.series.total,
            "dashboard refreshed"
        );
        self.notify();
    }

    fn notify(&self) {
        let snapshot = self.snapshot();
        for observer in &self.observers {
            observer.on_change(&snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::generator::SeriesGenerator;
    use crate::core::source::SyntheticSource;
    use crate::domain::clock::FixedClock;
    use crate::domain::model::DataPoint;
    use crate::utils::error::AnalyticsError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::{Arc, Mutex};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap()
    }

    fn dashboard() -> Dashboard<SyntheticSource<FixedClock>, FixedClock> {
        let source =
            SyntheticSource::with_generator(FixedClock(now()), SeriesGenerator::with_seed(1));
        Dashboard::new(source, FixedClock(now()))
    }

    struct FailingSource;

    #[async_trait]
    impl AnalyticsSource for FailingSource {
        async fn fetch(&self, _source_id: &str, _params: &GraphParams) -> Result<Vec<DataPoint>> {
            Err(AnalyticsError::SourceError {
                message: "backend unavailable".to_string(),
            })
        }
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<DashboardSnapshot>>>);

    impl DashboardObserver for Recorder {
        fn on_change(&self, snapshot: &DashboardSnapshot) {
            self.0.lock().unwrap().push(snapshot.clone());
        }
    }

    #[tokio::test]
    async fn test_initial_state_is_week() {
        let mut dash = dashboard();
        assert_eq!(dash.period(), Period::Week);
        assert_eq!(dash.range_label(), "Jan 3 - 10");

        dash.refresh().await;
        assert_eq!(dash.series().values.len(), 7);
        assert_eq!(dash.series().labels[0], "Jan 4");
    }

    #[tokio::test]
    async fn test_select_day_charts_hours() {
        let mut dash = dashboard();
        dash.select_period(Period::Day).await;

        assert_eq!(dash.series().values.len(), 24);
        assert_eq!(dash.series().labels[0], "00:00");
        assert_eq!(dash.range_label(), "Jan 10 - 10");
    }

    #[tokio::test]
    async fn test_select_month_labels_by_month_name() {
        let mut dash = dashboard();
        dash.select_period(Period::Month).await;
        assert_eq!(dash.range_label(), "January 2024");

        dash.next_period().await.unwrap();
        assert_eq!(dash.range_label(), "February 2024");
    }

    #[tokio::test]
    async fn test_custom_keeps_current_range_and_sends_bounds() {
        let mut dash = dashboard();
        dash.select_period(Period::Day).await;
        dash.select_period(Period::Custom).await;

        // Day range kept; custom single day is charted hourly
        assert_eq!(dash.series().values.len(), 24);

        dash.edit_end(now() + chrono::Duration::days(2)).await;
        assert_eq!(dash.series().values.len(), 3);
        assert_eq!(dash.series().labels[0], "Jan 10");
    }

    #[tokio::test]
    async fn test_edit_start_past_end_clamps_end() {
        let mut dash = dashboard();
        dash.select_period(Period::Custom).await;
        let later = now() + chrono::Duration::days(30);
        dash.edit_start(later).await;

        let range = dash.range().unwrap();
        assert_eq!(range.start(), later);
        assert_eq!(range.end(), later);
    }

    #[tokio::test]
    async fn test_tab_change_switches_aggregation() {
        let mut dash = dashboard();
        dash.select_period(Period::Day).await;
        dash.select_category(Category::Battery).await;

        // Battery sits idle between 06:00 and 18:00
        assert_eq!(dash.series().values[12], 0.0);
        assert!(dash.series().values[20] > 0.0);
    }

    #[tokio::test]
    async fn test_failed_fetch_resets_chart() {
        let mut dash = Dashboard::new(FailingSource, FixedClock(now()));
        dash.refresh().await;

        assert!(dash.series().is_empty());
        assert_eq!(dash.total(), 0.0);
        assert_eq!(dash.range_label(), "Jan 3 - 10");
    }

    #[tokio::test]
    async fn test_empty_source_id_skips_fetch() {
        let mut dash = dashboard();
        dash.refresh().await;
        assert!(!dash.series().is_empty());

        dash.set_source_id("").await;
        // Previous chart is left in place; nothing was requested
        assert!(!dash.series().is_empty());
    }

    #[tokio::test]
    async fn test_observers_see_every_transition() {
        let recorder = Recorder::default();
        let mut dash = dashboard();
        dash.subscribe(Box::new(recorder.clone()));

        dash.select_period(Period::Day).await;
        dash.previous_period().await.unwrap();
        dash.select_category(Category::Solar).await;

        let seen = recorder.0.lock().unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1].range_label, "Jan 9 - 9");
        assert_eq!(seen[2].category, Category::Solar);
    }

    #[tokio::test]
    async fn test_open_loads_initial_week() {
        let source =
            SyntheticSource::with_generator(FixedClock(now()), SeriesGenerator::with_seed(4));
        let dash = Dashboard::open(source, FixedClock(now()), "SN-OPEN").await;

        assert_eq!(dash.series().values.len(), 7);
        assert!(dash.total() > 0.0);
    }

    #[tokio::test]
    async fn test_navigation_past_calendar_end_keeps_range() {
        let recorder = Recorder::default();
        let source =
            SyntheticSource::with_generator(FixedClock(now()), SeriesGenerator::with_seed(1));
        let mut dash = Dashboard::new(source, FixedClock(NaiveDateTime::MAX));
        dash.subscribe(Box::new(recorder.clone()));
        dash.select_period(Period::Day).await;
        let before = *dash.range().unwrap();

        let err = dash.next_period().await.unwrap_err();
        assert!(matches!(err, AnalyticsError::DateOutOfRange { .. }));
        assert_eq!(dash.range(), Some(&before));
        assert_eq!(recorder.0.lock().unwrap().len(), 1);
    }

    struct RejectingSource;

    #[async_trait]
    impl AnalyticsSource for RejectingSource {
        async fn fetch(&self, _source_id: &str, params: &GraphParams) -> Result<Vec<DataPoint>> {
            Err(AnalyticsError::InvalidDate {
                field: "timeScale".to_string(),
                value: params.period.to_string(),
            })
        }
    }

    #[tokio::test]
    async fn test_rejected_request_also_resets_chart() {
        let mut dash = Dashboard::new(RejectingSource, FixedClock(now()));
        dash.select_period(Period::Month).await;

        assert!(dash.series().is_empty());
        assert_eq!(dash.range_label(), "January 2024");
    }
}
