//! Synthetic energy-flow series.
//!
//! The shape is fixed (solar bell between 06:00 and 18:00, usage peaks in the
//! morning and evening, battery covering the night) and uniform noise is laid
//! on top. It is a placeholder for a real inverter feed, not a physical model.

use std::f64::consts::PI;

use chrono::{Duration, Months, NaiveDateTime, Timelike};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::model::{DataPoint, Granularity};
use crate::utils::error::{AnalyticsError, Result};

const SOLAR_BASE_KWH: f64 = 50.0;
const SOLAR_NOISE_KWH: f64 = 10.0;
const USAGE_BASE_KWH: f64 = 15.0;
const USAGE_NOISE_KWH: f64 = 10.0;
const MORNING_PEAK_KWH: f64 = 20.0;
const EVENING_PEAK_KWH: f64 = 30.0;
const NIGHT_GRID_IMPORT_KWH: f64 = 10.0;
const NIGHT_GRID_CHARGE_KWH: f64 = 5.0;

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// 0 outside daylight, 1 at noon.
pub fn solar_strength(hour: u32) -> f64 {
    let h = f64::from(hour);
    ((h - 6.0) * PI / 12.0).sin().max(0.0)
}

fn is_morning_peak(hour: u32) -> bool {
    (7..=9).contains(&hour)
}

fn is_evening_peak(hour: u32) -> bool {
    (18..=21).contains(&hour)
}

fn is_night_tariff(hour: u32) -> bool {
    hour > 22 || hour < 5
}

/// Battery discharges to the house before dawn and after 18:00.
fn battery_covers_home(hour: u32) -> bool {
    hour < 6 || hour > 18
}

/// Timestamp of the `index`-th bucket after `start`, if it is representable.
pub fn step_timestamp(
    start: NaiveDateTime,
    granularity: Granularity,
    index: u32,
) -> Option<NaiveDateTime> {
    match granularity {
        Granularity::Hour => start.checked_add_signed(Duration::hours(i64::from(index))),
        Granularity::Day => start.checked_add_signed(Duration::days(i64::from(index))),
        Granularity::Month => start.checked_add_months(Months::new(index)),
    }
}

#[derive(Debug)]
pub struct SeriesGenerator {
    rng: StdRng,
}

impl SeriesGenerator {
    /// Entropy-seeded.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Same seed, same series.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn from_seed_option(seed: Option<u64>) -> Self {
        seed.map_or_else(Self::new, Self::with_seed)
    }

    /// Produces exactly `step_count` points, one granularity step apart.
    pub fn generate(
        &mut self,
        start: NaiveDateTime,
        granularity: Granularity,
        step_count: u32,
        source_id: &str,
    ) -> Result<Vec<DataPoint>> {
        if source_id.trim().is_empty() {
            return Err(AnalyticsError::MissingSourceId);
        }

        tracing::debug!(%start, %granularity, step_count, source_id, "generating synthetic series");

        (0..step_count)
            .map(|i| -> Result<DataPoint> {
                let timestamp = step_timestamp(start, granularity, i).ok_or_else(|| {
                    AnalyticsError::DateOutOfRange {
                        start: start.to_string(),
                        end: format!("{} {} steps later", i, granularity),
                    }
                })?;
                Ok(self.build_point(timestamp, granularity, source_id))
            })
            .collect()
    }

    fn build_point(
        &mut self,
        timestamp: NaiveDateTime,
        granularity: Granularity,
        source_id: &str,
    ) -> DataPoint {
        let hour = timestamp.hour();

        let solar_total =
            solar_strength(hour) * (SOLAR_BASE_KWH + self.rng.gen_range(0.0..SOLAR_NOISE_KWH));
        let solar_to_home = solar_total * 0.4;
        let solar_to_battery = solar_total * 0.4;
        let solar_exported = solar_total * 0.2;

        let mut usage_base = USAGE_BASE_KWH;
        if is_morning_peak(hour) {
            usage_base += MORNING_PEAK_KWH;
        }
        if is_evening_peak(hour) {
            usage_base += EVENING_PEAK_KWH;
        }
        usage_base += self.rng.gen_range(0.0..USAGE_NOISE_KWH);

        let battery_to_home = if battery_covers_home(hour) {
            usage_base * 0.8
        } else {
            0.0
        };
        let grid_to_home = (usage_base - solar_to_home - battery_to_home).max(0.0);

        let (night_import, grid_to_battery) = if is_night_tariff(hour) {
            (NIGHT_GRID_IMPORT_KWH, NIGHT_GRID_CHARGE_KWH)
        } else {
            (0.0, 0.0)
        };

        DataPoint {
            timestamp,
            granularity,
            source_id: source_id.to_string(),
            battery_to_home: round_to(battery_to_home, 2),
            solar_to_battery: round_to(solar_to_battery, 2),
            grid_to_battery,
            gen_to_battery: 0.0,
            solar_to_home: round_to(solar_to_home, 2),
            grid_to_home: round_to(grid_to_home, 2),
            generator_to_home: 0.0,
            grid_imported: round_to(grid_to_home + night_import, 2),
            battery_exported: 0.0,
            solar_exported: round_to(solar_exported, 2),
        }
    }
}

impl Default for SeriesGenerator {
    fn default() -> Self {
        Self::new()
    }
}
