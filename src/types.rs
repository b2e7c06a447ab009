//! Core types for the pawprint pipeline
//!
//! This module defines the data structures that flow through each stage of the
//! pipeline: raw entries, time-normalized entries, aggregated records, and the
//! assembled report.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Tracking category as it appears in the export's `category` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Symptom,
    Mood,
    Energy,
    Sleep,
    #[serde(rename = "Sleep quality")]
    SleepQuality,
    Factors,
}

impl Category {
    /// Fixed iteration order used when assembling the long-form table
    pub const ALL: [Category; 6] = [
        Category::Symptom,
        Category::Mood,
        Category::Energy,
        Category::Sleep,
        Category::SleepQuality,
        Category::Factors,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Symptom => "Symptom",
            Category::Mood => "Mood",
            Category::Energy => "Energy",
            Category::Sleep => "Sleep",
            Category::SleepQuality => "Sleep quality",
            Category::Factors => "Factors",
        }
    }

    /// Match an export label against the six fixed categories
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.as_str() == label)
    }
}

/// One row of the export as loaded, before timestamp reconstruction.
///
/// The category stays a plain string here: rows outside the six fixed labels
/// survive loading but are never selected by any aggregation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEntry {
    /// Calendar date of the entry
    pub date: NaiveDate,
    /// Fuzzy time-of-day token, a clock time, or empty
    pub time_of_day: String,
    /// Export category label
    pub category: String,
    /// Free-text detail, may be empty
    pub detail: String,
    /// Raw rating/amount value, numeric except for Sleep (`H:MM`)
    pub rating: String,
}

/// A raw entry with its full timestamp reconstructed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEntry {
    pub datetime: NaiveDateTime,
    pub category: String,
    pub detail: String,
    pub rating: String,
}

/// One observation of the long-form table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedRecord {
    pub datetime: NaiveDateTime,
    pub category: Category,
    /// Set only for Factors-category occurrence records
    pub factor: Option<String>,
    #[serde(rename = "rating/amount")]
    pub rating: f64,
    /// Trailing rolling average; absent until the window fills
    pub average: Option<f64>,
    pub detail: Option<String>,
}

/// Outputs of one pipeline run that outlive the intermediate records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackerReport {
    /// Long-form table, sorted non-decreasing by datetime
    pub longform: Vec<AggregatedRecord>,
    /// Distinct factor tokens, deduplicated and sorted
    pub factors_unique: Vec<String>,
    /// Distinct entry dates, sorted
    pub dates: Vec<NaiveDate>,
}
