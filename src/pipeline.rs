//! Pipeline orchestration
//!
//! This module provides the public API for pawprint. It runs the full
//! transformation: extraction → time normalization → per-category
//! aggregation → trend computation → long-form assembly.

use std::collections::BTreeSet;
use std::path::Path;

use crate::aggregator::CategoryAggregator;
use crate::chart::{ChartBuilder, Figure};
use crate::error::PipelineError;
use crate::loader::Loader;
use crate::longform::LongformAssembler;
use crate::normalizer::TimeNormalizer;
use crate::trend::{TrendCalculator, TREND_WINDOW};
use crate::types::{Category, RawEntry, TrackerReport};

/// Run the whole pipeline on a CSV export with the default trend window.
///
/// # Example
/// ```ignore
/// let report = pawprint::csv_to_longform("bearable-export.csv")?;
/// println!("{} observations", report.longform.len());
/// ```
pub fn csv_to_longform(path: impl AsRef<Path>) -> Result<TrackerReport, PipelineError> {
    TrackerPipeline::new().process_file(path.as_ref())
}

/// Configurable pipeline runner
pub struct TrackerPipeline {
    trend_window: usize,
}

impl Default for TrackerPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackerPipeline {
    /// Create a pipeline with the default trend window
    pub fn new() -> Self {
        Self {
            trend_window: TREND_WINDOW,
        }
    }

    /// Create a pipeline with a specific trend window
    pub fn with_trend_window(window: usize) -> Self {
        Self {
            trend_window: window,
        }
    }

    /// Load a CSV export and run the transformation
    pub fn process_file(&self, path: &Path) -> Result<TrackerReport, PipelineError> {
        let raw = Loader::load(path)?;
        self.process(raw)
    }

    /// Run the transformation on already-loaded raw entries.
    ///
    /// Pipeline stages:
    /// 1. TimeNormalizer - Reconstruct full timestamps
    /// 2. CategoryAggregator - Apply per-category rules
    /// 3. TrendCalculator - Stamp rolling averages per stream
    /// 4. LongformAssembler - Concatenate and sort the final table
    pub fn process(&self, raw: Vec<RawEntry>) -> Result<TrackerReport, PipelineError> {
        let dates: Vec<_> = raw
            .iter()
            .map(|entry| entry.date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let normalized = TimeNormalizer::normalize(raw)?;

        let mut per_category = Vec::with_capacity(Category::ALL.len());
        let mut factors_unique = Vec::new();
        for category in Category::ALL {
            let mut output = CategoryAggregator::aggregate(category, &normalized)?;
            match category {
                Category::Factors => {
                    TrendCalculator::apply_by_factor(&mut output.records, self.trend_window)
                }
                _ => TrendCalculator::apply(&mut output.records, self.trend_window),
            }
            if let Some(set) = output.factors_unique {
                factors_unique = set;
            }
            per_category.push(output.records);
        }

        let longform = LongformAssembler::assemble(per_category);
        tracing::info!(
            rows = longform.len(),
            factors = factors_unique.len(),
            days = dates.len(),
            "assembled long-form table"
        );

        Ok(TrackerReport {
            longform,
            factors_unique,
            dates,
        })
    }

    /// Build the two chart figures from a finished report
    pub fn charts(&self, report: &TrackerReport) -> (Figure, Figure) {
        ChartBuilder::build(&report.longform, &report.factors_unique)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Loader;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
date,time of day,category,detail,rating/amount
2021-03-01,am,Mood,,7
2021-03-01,pm,Mood,,5
2021-03-01,,Sleep,,7:30
2021-03-01,am,Sleep quality,,6
2021-03-01,mid,Symptom,Headache (mild),2
2021-03-01,mid,Symptom,Headache (severe),4
2021-03-01,all day,Factors,Stress | Travel,
2021-03-02,am,Energy,,4
2021-03-02,all day,Factors,Stress,
";

    fn sample_report() -> TrackerReport {
        let raw = Loader::read(SAMPLE.as_bytes()).unwrap();
        TrackerPipeline::new().process(raw).unwrap()
    }

    #[test]
    fn test_end_to_end_shape() {
        let report = sample_report();

        // 2 mood + 1 sleep + 1 sleep quality + 1 symptom (collapsed)
        // + 1 energy + 3 factor occurrences
        assert_eq!(report.longform.len(), 9);
        assert_eq!(
            report.factors_unique,
            vec!["Stress".to_string(), "Travel".to_string()]
        );
        assert_eq!(
            report.dates,
            vec![
                NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
                NaiveDate::from_ymd_opt(2021, 3, 2).unwrap(),
            ]
        );
    }

    #[test]
    fn test_table_sorted_by_datetime() {
        let report = sample_report();

        let datetimes: Vec<_> = report.longform.iter().map(|r| r.datetime).collect();
        let mut sorted = datetimes.clone();
        sorted.sort();
        assert_eq!(datetimes, sorted);
    }

    #[test]
    fn test_symptom_collapsed_and_sleep_converted() {
        let report = sample_report();

        let symptom: Vec<_> = report
            .longform
            .iter()
            .filter(|r| r.category == Category::Symptom)
            .collect();
        assert_eq!(symptom.len(), 1);
        assert_eq!(symptom[0].rating, 3.0);

        let sleep: Vec<_> = report
            .longform
            .iter()
            .filter(|r| r.category == Category::Sleep)
            .collect();
        assert_eq!(sleep[0].rating, 7.5);
    }

    #[test]
    fn test_pipeline_is_idempotent() {
        let raw = Loader::read(SAMPLE.as_bytes()).unwrap();
        let first = TrackerPipeline::new().process(raw.clone()).unwrap();
        let second = TrackerPipeline::new().process(raw).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_trend_window_is_configurable() {
        let raw = Loader::read(SAMPLE.as_bytes()).unwrap();
        let report = TrackerPipeline::with_trend_window(2).process(raw).unwrap();

        let mood: Vec<_> = report
            .longform
            .iter()
            .filter(|r| r.category == Category::Mood)
            .collect();
        assert_eq!(mood[0].average, None);
        assert_eq!(mood[1].average, Some(6.0));
    }

    #[test]
    fn test_rolling_average_over_daily_values() {
        let mut csv = String::from("date,time of day,category,detail,rating/amount\n");
        for day in 1..=7 {
            csv.push_str(&format!("2021-03-{day:02},am,Mood,,{day}\n"));
        }
        let raw = Loader::read(csv.as_bytes()).unwrap();
        let report = TrackerPipeline::new().process(raw).unwrap();

        let averages: Vec<_> = report.longform.iter().map(|r| r.average).collect();
        assert_eq!(averages[..6], vec![None; 6]);
        assert_eq!(averages[6], Some(4.0));
    }

    #[test]
    fn test_unknown_category_rows_drop_out() {
        let csv = "\
date,time of day,category,detail,rating/amount
2021-03-01,am,Mood,,7
2021-03-01,am,Meds/Supplements,Magnesium,1
";
        let raw = Loader::read(csv.as_bytes()).unwrap();
        let report = TrackerPipeline::new().process(raw).unwrap();

        assert_eq!(report.longform.len(), 1);
        assert_eq!(report.longform[0].category, Category::Mood);
    }

    #[test]
    fn test_bad_time_token_aborts_the_run() {
        let csv = "\
date,time of day,category,detail,rating/amount
2021-03-01,dusk,Mood,,7
";
        let raw = Loader::read(csv.as_bytes()).unwrap();
        let result = TrackerPipeline::new().process(raw);

        assert!(matches!(result, Err(PipelineError::UnknownTimeToken(t)) if t == "dusk"));
    }

    #[test]
    fn test_charts_from_report() {
        let report = sample_report();
        let (measurements, factors) = TrackerPipeline::new().charts(&report);

        assert_eq!(measurements.traces().len(), 10);
        assert_eq!(factors.traces().len(), 2);
    }

    #[test]
    fn test_empty_export() {
        let raw = Loader::read("date,time of day,category,detail,rating/amount\n".as_bytes())
            .unwrap();
        let report = TrackerPipeline::new().process(raw).unwrap();

        assert!(report.longform.is_empty());
        assert!(report.factors_unique.is_empty());
        assert!(report.dates.is_empty());
    }
}
