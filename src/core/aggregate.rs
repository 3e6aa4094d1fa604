use chrono::NaiveDateTime;

use crate::core::generator::round_to;
use crate::domain::model::{Category, ChartSeries, DataPoint, Granularity};

/// The charted value of one point for `category`.
pub fn category_value(point: &DataPoint, category: Category) -> f64 {
    match category {
        Category::Grid => point.grid_imported,
        Category::Solar => point.solar_to_home + point.solar_to_battery + point.solar_exported,
        Category::Battery => point.battery_to_home,
        Category::Home => {
            point.battery_to_home + point.solar_to_home + point.grid_to_home + point.generator_to_home
        }
    }
}

pub fn axis_label(timestamp: NaiveDateTime, granularity: Granularity) -> String {
    match granularity {
        Granularity::Hour => timestamp.format("%H:%M").to_string(),
        Granularity::Month => timestamp.format("%b %Y").to_string(),
        Granularity::Day => timestamp.format("%b %-d").to_string(),
    }
}

/// Labels, values and the total (one decimal) for `category`.
pub fn build_series(points: &[DataPoint], category: Category) -> ChartSeries {
    if points.is_empty() {
        return ChartSeries::empty();
    }

    let labels = points
        .iter()
        .map(|p| axis_label(p.timestamp, p.granularity))
        .collect();
    let values: Vec<f64> = points.iter().map(|p| category_value(p, category)).collect();
    let total = round_to(values.iter().sum(), 1);

    ChartSeries {
        labels,
        values,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn point(hour: u32) -> DataPoint {
        DataPoint {
            timestamp: NaiveDate::from_ymd_opt(2024, 1, 5)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
            granularity: Granularity::Hour,
            source_id: "SN-1".to_string(),
            battery_to_home: 1.25,
            solar_to_battery: 2.0,
            grid_to_battery: 5.0,
            gen_to_battery: 0.0,
            solar_to_home: 3.5,
            grid_to_home: 4.75,
            generator_to_home: 0.5,
            grid_imported: 12.34,
            battery_exported: 0.0,
            solar_exported: 1.0,
        }
    }

    #[test]
    fn test_category_values() {
        let p = point(3);
        assert_eq!(category_value(&p, Category::Grid), 12.34);
        assert_eq!(category_value(&p, Category::Solar), 6.5);
        assert_eq!(category_value(&p, Category::Battery), 1.25);
        assert_eq!(category_value(&p, Category::Home), 1.25 + 3.5 + 4.75 + 0.5);
    }

    #[test]
    fn test_axis_labels() {
        let ts = NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        assert_eq!(axis_label(ts, Granularity::Hour), "09:00");
        assert_eq!(axis_label(ts, Granularity::Day), "Mar 7");
        assert_eq!(axis_label(ts, Granularity::Month), "Mar 2024");
    }

    #[test]
    fn test_build_series_totals_to_one_decimal() {
        let points = vec![point(0), point(1), point(2)];
        let series = build_series(&points, Category::Grid);

        assert_eq!(series.labels, vec!["00:00", "01:00", "02:00"]);
        assert_eq!(series.values, vec![12.34, 12.34, 12.34]);
        assert_eq!(series.total, 37.0);
    }

    #[test]
    fn test_build_series_empty_input() {
        let series = build_series(&[], Category::Solar);
        assert!(series.is_empty());
        assert_eq!(series.total, 0.0);
    }
}
