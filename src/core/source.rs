use std::sync::Mutex;

use async_trait::async_trait;

use crate::core::generator::SeriesGenerator;
use crate::core::period;
use crate::domain::model::{DataPoint, GraphParams};
use crate::domain::ports::{AnalyticsSource, Clock};
use crate::utils::error::{AnalyticsError, Result};

/// In-process stand-in for the inverter analytics API.
pub struct SyntheticSource<C: Clock> {
    clock: C,
    generator: Mutex<SeriesGenerator>,
}

impl<C: Clock> SyntheticSource<C> {
    pub fn new(clock: C) -> Self {
        Self::with_generator(clock, SeriesGenerator::new())
    }

    pub fn with_generator(clock: C, generator: SeriesGenerator) -> Self {
        Self {
            clock,
            generator: Mutex::new(generator),
        }
    }
}

#[async_trait]
impl<C: Clock> AnalyticsSource for SyntheticSource<C> {
    async fn fetch(&self, source_id: &str, params: &GraphParams) -> Result<Vec<DataPoint>> {
        if source_id.trim().is_empty() {
            return Err(AnalyticsError::MissingSourceId);
        }

        let scale = period::resolve(
            self.clock.now(),
            params.period,
            params.start_date,
            params.end_date,
        )?;
        tracing::debug!(
            period = %params.period,
            start = %scale.start,
            granularity = %scale.granularity,
            steps = scale.step_count,
            "resolved graph scale"
        );

        let mut generator = self.generator.lock().map_err(|_| AnalyticsError::SourceError {
            message: "series generator lock poisoned".to_string(),
        })?;
        generator.generate(scale.start, scale.granularity, scale.step_count, source_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::clock::FixedClock;
    use crate::domain::model::{Granularity, Period};
    use chrono::NaiveDate;

    fn source() -> SyntheticSource<FixedClock> {
        let now = NaiveDate::from_ymd_opt(2024, 1, 10)
            .unwrap()
            .and_hms_opt(14, 0, 0)
            .unwrap();
        SyntheticSource::with_generator(FixedClock(now), SeriesGenerator::with_seed(1))
    }

    #[tokio::test]
    async fn test_fetch_fails_fast_without_source_id() {
        let err = source().fetch("", &GraphParams::default()).await.unwrap_err();
        assert!(matches!(err, AnalyticsError::MissingSourceId));
    }

    #[tokio::test]
    async fn test_fetch_week_by_default() {
        let points = source().fetch("SN-1", &GraphParams::default()).await.unwrap();

        assert_eq!(points.len(), 7);
        assert_eq!(points[0].timestamp.date(), NaiveDate::from_ymd_opt(2024, 1, 4).unwrap());
        assert_eq!(points[0].granularity, Granularity::Day);
    }

    #[tokio::test]
    async fn test_fetch_custom_single_day_is_hourly() {
        let day = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
        let params = GraphParams {
            period: Period::Custom,
            start_date: day.and_hms_opt(8, 0, 0),
            end_date: day.and_hms_opt(18, 0, 0),
        };

        let points = source().fetch("SN-1", &params).await.unwrap();
        assert_eq!(points.len(), 24);
        assert_eq!(points[0].timestamp, day.and_hms_opt(0, 0, 0).unwrap());
    }
}
