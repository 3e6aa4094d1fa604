//! Period resolution: turns a symbolic period into concrete bounds.
//!
//! Two variants exist per period. [`resolve`] produces the window that data
//! is generated for, [`display_range`] the window the dashboard shows and
//! navigates. For `week` and `month` they differ: the display window is a
//! raw offset from now (week) or the calendar month (month), while
//! generation looks back a whole number of days aligned to midnight.

use std::fmt::Display;

use chrono::{Datelike, Duration, Months, NaiveDateTime, NaiveTime};

use crate::domain::model::{DateRange, Direction, Granularity, Period, ResolvedScale, StepUnit};
use crate::utils::error::{AnalyticsError, Result};

const HOURS_PER_DAY: u32 = 24;
const WEEK_LOOKBACK_DAYS: u32 = 7;
const MONTH_LOOKBACK_DAYS: u32 = 30;

pub fn start_of_day(ts: NaiveDateTime) -> NaiveDateTime {
    ts.date().and_time(NaiveTime::MIN)
}

fn checked_end_of_day(ts: NaiveDateTime) -> Option<NaiveDateTime> {
    start_of_day(ts)
        .checked_add_signed(Duration::days(1))?
        .checked_sub_signed(Duration::milliseconds(1))
}

/// Last millisecond of the day; saturates on the last representable day.
pub fn end_of_day(ts: NaiveDateTime) -> NaiveDateTime {
    checked_end_of_day(ts).unwrap_or(NaiveDateTime::MAX)
}

pub fn start_of_month(ts: NaiveDateTime) -> NaiveDateTime {
    let date = ts.date();
    (date - Duration::days(i64::from(date.day0()))).and_time(NaiveTime::MIN)
}

fn checked_end_of_month(ts: NaiveDateTime) -> Option<NaiveDateTime> {
    start_of_month(ts)
        .checked_add_months(Months::new(1))?
        .checked_sub_signed(Duration::milliseconds(1))
}

pub fn end_of_month(ts: NaiveDateTime) -> NaiveDateTime {
    checked_end_of_month(ts).unwrap_or(NaiveDateTime::MAX)
}

fn out_of_range(start: impl Display, end: impl Display) -> AnalyticsError {
    AnalyticsError::DateOutOfRange {
        start: start.to_string(),
        end: end.to_string(),
    }
}

fn day_scale(start: NaiveDateTime, days: u32) -> Result<ResolvedScale> {
    let end = start
        .checked_add_signed(Duration::days(i64::from(days)))
        .and_then(|ts| ts.checked_sub_signed(Duration::milliseconds(1)))
        .ok_or_else(|| out_of_range(start, format_args!("{} days later", days)))?;
    Ok(ResolvedScale {
        start,
        end,
        granularity: Granularity::Day,
        step_unit: StepUnit::Day,
        step_count: days,
    })
}

fn hour_scale(start: NaiveDateTime) -> ResolvedScale {
    ResolvedScale {
        start,
        end: end_of_day(start),
        granularity: Granularity::Hour,
        step_unit: StepUnit::Hour,
        step_count: HOURS_PER_DAY,
    }
}

/// Lookback of `days` days ending today, aligned to midnight.
fn lookback_scale(now: NaiveDateTime, days: u32) -> Result<ResolvedScale> {
    let start = start_of_day(now)
        .checked_sub_signed(Duration::days(i64::from(days - 1)))
        .ok_or_else(|| out_of_range(format_args!("{} days before", days - 1), now))?;
    day_scale(start, days)
}

/// Resolves the generation window for `period`.
///
/// `Custom` needs both bounds; without them the request is treated as
/// `Week`. A custom range ending before it starts is rejected.
pub fn resolve(
    now: NaiveDateTime,
    period: Period,
    custom_start: Option<NaiveDateTime>,
    custom_end: Option<NaiveDateTime>,
) -> Result<ResolvedScale> {
    match (period, custom_start, custom_end) {
        (Period::Day, _, _) => Ok(hour_scale(start_of_day(now))),
        (Period::Month, _, _) => lookback_scale(now, MONTH_LOOKBACK_DAYS),
        (Period::Custom, Some(start), Some(end)) => resolve_custom(start, end),
        (Period::Custom, _, _) => {
            tracing::debug!("custom period without bounds, falling back to week");
            lookback_scale(now, WEEK_LOOKBACK_DAYS)
        }
        (Period::Week, _, _) => lookback_scale(now, WEEK_LOOKBACK_DAYS),
    }
}

fn resolve_custom(start: NaiveDateTime, end: NaiveDateTime) -> Result<ResolvedScale> {
    let start = start_of_day(start);
    let end = start_of_day(end);
    if end < start {
        return Err(AnalyticsError::InvalidDateRange {
            start: start.to_string(),
            end: end.to_string(),
        });
    }

    let day_diff = (end - start).num_days();
    if day_diff == 0 {
        return Ok(hour_scale(start));
    }

    let days = u32::try_from(day_diff + 1).map_err(|_| AnalyticsError::InvalidDateRange {
        start: start.to_string(),
        end: end.to_string(),
    })?;
    day_scale(start, days)
}

/// The window shown when `period` is selected.
pub fn display_range(now: NaiveDateTime, period: Period) -> DateRange {
    match period {
        Period::Day => DateRange::from_ordered(start_of_day(now), end_of_day(now)),
        Period::Week => DateRange::from_ordered(
            now.checked_sub_signed(Duration::days(7))
                .unwrap_or(NaiveDateTime::MIN),
            now,
        ),
        Period::Month => DateRange::from_ordered(start_of_month(now), end_of_month(now)),
        Period::Custom => DateRange::from_ordered(now, now),
    }
}

/// Moves `range` one period back or forward.
///
/// Fails with `DateOutOfRange` when the result would leave the calendar.
pub fn shift(range: &DateRange, period: Period, direction: Direction) -> Result<DateRange> {
    let sign = i64::from(direction.sign());
    let (start, end) = (range.start(), range.end());

    let shifted = match period {
        Period::Day => start
            .checked_add_signed(Duration::days(sign))
            .and_then(|new_start| Some((new_start, checked_end_of_day(new_start)?))),
        Period::Week => {
            let offset = Duration::days(sign * 7);
            start
                .checked_add_signed(offset)
                .zip(end.checked_add_signed(offset))
        }
        Period::Month => {
            let month_start = start_of_month(start);
            match direction {
                Direction::Next => month_start.checked_add_months(Months::new(1)),
                Direction::Previous => month_start.checked_sub_months(Months::new(1)),
            }
            .and_then(|new_start| Some((new_start, checked_end_of_month(new_start)?)))
        }
        Period::Custom => {
            let span = Duration::days((end - start).num_days());
            match direction {
                Direction::Next => Some(end),
                Direction::Previous => start.checked_sub_signed(span),
            }
            .and_then(|new_start| Some((new_start, new_start.checked_add_signed(span)?)))
        }
    };

    shifted
        .map(|(new_start, new_end)| DateRange::from_ordered(new_start, new_end))
        .ok_or_else(|| out_of_range(start, end))
}

/// Applies a manual start edit; pushes the end forward if it would precede the start.
pub fn on_start_edited(range: &DateRange, new_start: NaiveDateTime) -> DateRange {
    if new_start > range.end() {
        DateRange::from_ordered(new_start, new_start)
    } else {
        DateRange::from_ordered(new_start, range.end())
    }
}

/// Applies a manual end edit; pulls the start back if it would follow the end.
pub fn on_end_edited(range: &DateRange, new_end: NaiveDateTime) -> DateRange {
    if new_end < range.start() {
        DateRange::from_ordered(new_end, new_end)
    } else {
        DateRange::from_ordered(range.start(), new_end)
    }
}

/// "January 2024" for months, "Jan 1 - 7" within a month, "Jan 29 - Feb 4" across months.
pub fn format_range_label(period: Period, range: &DateRange) -> String {
    let (start, end) = (range.start(), range.end());

    if period == Period::Month {
        return start.format("%B %Y").to_string();
    }

    if start.year() == end.year() && start.month() == end.month() {
        format!("{} - {}", start.format("%b %-d"), end.format("%-d"))
    } else {
        format!("{} - {}", start.format("%b %-d"), end.format("%b %-d"))
    }
}
