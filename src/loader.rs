//! Export extraction
//!
//! This module reads the CSV export into typed raw entries. Columns are
//! addressed by header name, so their order in the file does not matter.

use std::fs::File;
use std::io;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::PipelineError;
use crate::types::RawEntry;

/// Date formats the export family produces, tried in order
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Wire shape of one CSV row; only `date` is mandatory
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    #[serde(rename = "time of day", default)]
    time_of_day: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    detail: String,
    #[serde(rename = "rating/amount", default)]
    rating: String,
}

/// Loader for turning a CSV export into raw entries
pub struct Loader;

impl Loader {
    /// Load raw entries from a CSV file on disk
    pub fn load(path: &Path) -> Result<Vec<RawEntry>, PipelineError> {
        let file = File::open(path).map_err(|source| PipelineError::LoadError {
            path: path.display().to_string(),
            source,
        })?;
        Self::read(file)
    }

    /// Load raw entries from any CSV reader
    pub fn read<R: io::Read>(reader: R) -> Result<Vec<RawEntry>, PipelineError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut entries = Vec::new();

        for row in csv_reader.deserialize() {
            let row: CsvRow = row?;
            entries.push(RawEntry {
                date: parse_date(&row.date)?,
                time_of_day: row.time_of_day,
                category: row.category,
                detail: row.detail,
                rating: row.rating,
            });
        }

        tracing::debug!(rows = entries.len(), "loaded raw entries");
        Ok(entries)
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, PipelineError> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(value, format).ok())
        .ok_or_else(|| PipelineError::DateParseError(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const SAMPLE: &str = "\
date,time of day,category,detail,rating/amount
2021-03-01,am,Mood,,7
2021-03-01,pm,Sleep,,7:30
2021-03-02,,Factors,Stress | Travel,
";

    #[test]
    fn test_read_sample_rows() {
        let entries = Loader::read(SAMPLE.as_bytes()).unwrap();

        assert_eq!(entries.len(), 3);
        assert_eq!(
            entries[0].date,
            NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()
        );
        assert_eq!(entries[0].time_of_day, "am");
        assert_eq!(entries[0].category, "Mood");
        assert_eq!(entries[0].rating, "7");
        assert_eq!(entries[1].rating, "7:30");
        assert_eq!(entries[2].time_of_day, "");
        assert_eq!(entries[2].detail, "Stress | Travel");
    }

    #[test]
    fn test_column_order_does_not_matter() {
        let reordered = "\
category,rating/amount,date,detail,time of day
Energy,4,2021-03-05,,mid
";
        let entries = Loader::read(reordered.as_bytes()).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].category, "Energy");
        assert_eq!(entries[0].rating, "4");
        assert_eq!(entries[0].time_of_day, "mid");
    }

    #[test]
    fn test_alternate_date_formats() {
        assert_eq!(
            parse_date("2021/03/01").unwrap(),
            NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()
        );
        assert_eq!(
            parse_date("03/01/2021").unwrap(),
            NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_bad_date_is_an_error() {
        let bad = "\
date,time of day,category,detail,rating/amount
not-a-date,am,Mood,,7
";
        let result = Loader::read(bad.as_bytes());
        assert!(matches!(result, Err(PipelineError::DateParseError(v)) if v == "not-a-date"));
    }

    #[test]
    fn test_missing_file_is_a_load_error() {
        let result = Loader::load(Path::new("/nonexistent/export.csv"));
        assert!(matches!(result, Err(PipelineError::LoadError { .. })));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let entries = Loader::load(file.path()).unwrap();
        assert_eq!(entries.len(), 3);
    }
}
