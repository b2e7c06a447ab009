//! Per-category aggregation rules
//!
//! Each of the six categories has a transformation rule that turns its subset
//! of normalized entries into aggregated records:
//! - Mood, Energy, Sleep quality: numeric coercion of the rating
//! - Sleep: `H:MM` duration converted to fractional hours
//! - Symptom: parenthetical suffix stripped, then mean per detail, then sum
//!   per timestamp (two sequential keyed reductions)
//! - Factors: occurrence records per unique factor token, rating fixed at 1

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;

use crate::error::PipelineError;
use crate::types::{AggregatedRecord, Category, NormalizedEntry};

/// Output of one category's aggregation rule
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryOutput {
    /// Aggregated records, sorted ascending by datetime (factor-major for
    /// the Factors category)
    pub records: Vec<AggregatedRecord>,
    /// Factor vocabulary; only the Factors rule produces one
    pub factors_unique: Option<Vec<String>>,
}

/// Aggregator applying the fixed category → rule dispatch
pub struct CategoryAggregator;

impl CategoryAggregator {
    /// Apply `category`'s rule to its subset of `entries`
    pub fn aggregate(
        category: Category,
        entries: &[NormalizedEntry],
    ) -> Result<CategoryOutput, PipelineError> {
        let mut subset: Vec<&NormalizedEntry> = entries
            .iter()
            .filter(|entry| entry.category == category.as_str())
            .collect();
        subset.sort_by_key(|entry| entry.datetime);

        let output = match category {
            Category::Symptom => CategoryOutput {
                records: aggregate_symptom(&subset)?,
                factors_unique: None,
            },
            Category::Sleep => CategoryOutput {
                records: aggregate_sleep(&subset)?,
                factors_unique: None,
            },
            Category::Factors => {
                let (records, factors_unique) = aggregate_factors(&subset);
                CategoryOutput {
                    records,
                    factors_unique: Some(factors_unique),
                }
            }
            _ => CategoryOutput {
                records: aggregate_default(category, &subset)?,
                factors_unique: None,
            },
        };

        tracing::debug!(
            category = category.as_str(),
            entries = subset.len(),
            records = output.records.len(),
            "aggregated category subset"
        );
        Ok(output)
    }
}

/// Numeric coercion of the rating, keeping the entry detail
fn aggregate_default(
    category: Category,
    subset: &[&NormalizedEntry],
) -> Result<Vec<AggregatedRecord>, PipelineError> {
    subset
        .iter()
        .map(|entry| {
            Ok(AggregatedRecord {
                datetime: entry.datetime,
                category,
                factor: None,
                rating: coerce_numeric(category, &entry.rating)?,
                average: None,
                detail: non_empty(&entry.detail),
            })
        })
        .collect()
}

/// Sleep durations arrive as `H:MM` clock strings and become fractional hours
fn aggregate_sleep(subset: &[&NormalizedEntry]) -> Result<Vec<AggregatedRecord>, PipelineError> {
    subset
        .iter()
        .map(|entry| {
            Ok(AggregatedRecord {
                datetime: entry.datetime,
                category: Category::Sleep,
                factor: None,
                rating: duration_hours(&entry.rating)?,
                average: None,
                detail: non_empty(&entry.detail),
            })
        })
        .collect()
}

/// Symptom entries collapse in two stages: mean within each (datetime,
/// detail) group, then sum across details sharing a timestamp. The stages
/// stay separate; merging them changes results whenever one timestamp holds
/// several details.
fn aggregate_symptom(subset: &[&NormalizedEntry]) -> Result<Vec<AggregatedRecord>, PipelineError> {
    let mut detail_groups: BTreeMap<(NaiveDateTime, String), (f64, usize)> = BTreeMap::new();
    for entry in subset {
        let rating = coerce_numeric(Category::Symptom, &entry.rating)?;
        let detail = strip_parenthetical(&entry.detail);
        let slot = detail_groups
            .entry((entry.datetime, detail))
            .or_insert((0.0, 0));
        slot.0 += rating;
        slot.1 += 1;
    }

    let mut timestamp_sums: BTreeMap<NaiveDateTime, f64> = BTreeMap::new();
    for ((datetime, _detail), (sum, count)) in detail_groups {
        *timestamp_sums.entry(datetime).or_insert(0.0) += sum / count as f64;
    }

    Ok(timestamp_sums
        .into_iter()
        .map(|(datetime, rating)| AggregatedRecord {
            datetime,
            category: Category::Symptom,
            factor: None,
            rating,
            average: None,
            detail: None,
        })
        .collect())
}

/// Factors entries hold one or more `" | "`-separated tokens. The unique
/// vocabulary is derived once, then every entry containing a factor emits
/// one occurrence record for it, so a multi-factor entry matches several
/// times. Records come out factor-major.
fn aggregate_factors(subset: &[&NormalizedEntry]) -> (Vec<AggregatedRecord>, Vec<String>) {
    let mut unique: BTreeSet<String> = BTreeSet::new();
    for entry in subset {
        for token in entry.detail.split(" | ") {
            if !token.is_empty() {
                unique.insert(token.to_string());
            }
        }
    }
    let factors_unique: Vec<String> = unique.into_iter().collect();

    let mut records = Vec::new();
    for factor in &factors_unique {
        for entry in subset {
            if entry.detail.contains(factor.as_str()) {
                records.push(AggregatedRecord {
                    datetime: entry.datetime,
                    category: Category::Factors,
                    factor: Some(factor.clone()),
                    rating: 1.0,
                    average: None,
                    detail: None,
                });
            }
        }
    }

    (records, factors_unique)
}

fn coerce_numeric(category: Category, value: &str) -> Result<f64, PipelineError> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|_| PipelineError::CoercionError {
            category: category.as_str().to_string(),
            value: value.to_string(),
        })
}

/// `"7:30"` → 7.5 hours
fn duration_hours(value: &str) -> Result<f64, PipelineError> {
    let malformed = || PipelineError::DurationParseError(value.to_string());
    let (hours, minutes) = value.trim().split_once(':').ok_or_else(malformed)?;
    let hours: u32 = hours.parse().map_err(|_| malformed())?;
    let minutes: u32 = minutes.parse().map_err(|_| malformed())?;
    if minutes >= 60 {
        return Err(malformed());
    }
    Ok(f64::from(hours) + f64::from(minutes) / 60.0)
}

/// `"Headache (mild)"` → `"Headache"`; details without a parenthetical
/// suffix are kept whole
fn strip_parenthetical(detail: &str) -> String {
    match detail.rfind(" (") {
        Some(index) => detail[..index].to_string(),
        None => detail.to_string(),
    }
}

fn non_empty(detail: &str) -> Option<String> {
    if detail.is_empty() {
        None
    } else {
        Some(detail.to_string())
    }
}
