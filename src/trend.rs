//! Rolling trend computation
//!
//! Stamps a trailing simple moving average onto each ordered observation
//! stream. The average stays absent until the window has filled.

use crate::types::AggregatedRecord;

/// Default trailing window, in observations
pub const TREND_WINDOW: usize = 7;

/// Calculator for trailing moving averages over aggregated records
pub struct TrendCalculator;

impl TrendCalculator {
    /// Stamp the trailing average onto one stream of records, assumed
    /// ordered ascending by datetime
    pub fn apply(records: &mut [AggregatedRecord], window: usize) {
        if window == 0 {
            return;
        }
        for index in 0..records.len() {
            records[index].average = if index + 1 >= window {
                let sum: f64 = records[index + 1 - window..=index]
                    .iter()
                    .map(|record| record.rating)
                    .sum();
                Some(round2(sum / window as f64))
            } else {
                None
            };
        }
    }

    /// Stamp the trailing average per occurrence stream of a factor-major
    /// record run, so the window never straddles a factor boundary
    pub fn apply_by_factor(records: &mut [AggregatedRecord], window: usize) {
        let mut start = 0;
        while start < records.len() {
            let factor = records[start].factor.clone();
            let end = records[start..]
                .iter()
                .position(|record| record.factor != factor)
                .map_or(records.len(), |offset| start + offset);
            Self::apply(&mut records[start..end], window);
            start = end;
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn record(day: u32, rating: f64, factor: Option<&str>) -> AggregatedRecord {
        AggregatedRecord {
            datetime: NaiveDate::from_ymd_opt(2021, 3, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            category: if factor.is_some() {
                Category::Factors
            } else {
                Category::Mood
            },
            factor: factor.map(str::to_string),
            rating,
            average: None,
            detail: None,
        }
    }

    #[test]
    fn test_window_fills_on_seventh_observation() {
        let mut records: Vec<AggregatedRecord> = (1..=7)
            .map(|day| record(day, day as f64, None))
            .collect();

        TrendCalculator::apply(&mut records, TREND_WINDOW);

        for early in &records[..6] {
            assert_eq!(early.average, None);
        }
        assert_eq!(records[6].average, Some(4.0));
    }

    #[test]
    fn test_window_slides() {
        let mut records: Vec<AggregatedRecord> = (1..=8)
            .map(|day| record(day, day as f64, None))
            .collect();

        TrendCalculator::apply(&mut records, TREND_WINDOW);

        // Window over 2..=8 is 5.0
        assert_eq!(records[7].average, Some(5.0));
    }

    #[test]
    fn test_average_rounds_to_two_decimals() {
        let mut records = vec![
            record(1, 1.0, None),
            record(2, 2.0, None),
            record(3, 2.0, None),
        ];

        TrendCalculator::apply(&mut records, 3);

        // 5/3 = 1.666... → 1.67
        assert_eq!(records[2].average, Some(1.67));
    }

    #[test]
    fn test_short_stream_stays_unaveraged() {
        let mut records = vec![record(1, 3.0, None), record(2, 4.0, None)];

        TrendCalculator::apply(&mut records, TREND_WINDOW);

        assert!(records.iter().all(|r| r.average.is_none()));
    }

    #[test]
    fn test_factor_streams_average_independently() {
        let mut records: Vec<AggregatedRecord> = (1..=3)
            .map(|day| record(day, 1.0, Some("Stress")))
            .chain((1..=4).map(|day| record(day, 1.0, Some("Travel"))))
            .collect();

        TrendCalculator::apply_by_factor(&mut records, 3);

        // Stress stream: window fills at its own third record
        assert_eq!(records[0].average, None);
        assert_eq!(records[1].average, None);
        assert_eq!(records[2].average, Some(1.0));
        // Travel stream restarts the window
        assert_eq!(records[3].average, None);
        assert_eq!(records[4].average, None);
        assert_eq!(records[5].average, Some(1.0));
        assert_eq!(records[6].average, Some(1.0));
    }
}
