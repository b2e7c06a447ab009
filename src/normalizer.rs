//! Time-of-day normalization
//!
//! The export records when an entry happened as either a clock time or a
//! qualitative day-period token. This module resolves both into a concrete
//! time and combines it with the entry date into a full timestamp.

use chrono::NaiveTime;

use crate::error::PipelineError;
use crate::types::{NormalizedEntry, RawEntry};

/// Normalizer for reconstructing entry timestamps
pub struct TimeNormalizer;

impl TimeNormalizer {
    /// Resolve every entry's time-of-day token and attach the full timestamp
    pub fn normalize(entries: Vec<RawEntry>) -> Result<Vec<NormalizedEntry>, PipelineError> {
        entries
            .into_iter()
            .map(|entry| {
                let time = resolve_time_token(&entry.time_of_day)?;
                Ok(NormalizedEntry {
                    datetime: entry.date.and_time(time),
                    category: entry.category,
                    detail: entry.detail,
                    rating: entry.rating,
                })
            })
            .collect()
    }
}

/// Map a time-of-day token to a concrete time.
///
/// Tokens containing a colon pass through as `HH:MM`; the empty token means
/// midnight; day-period tokens are matched case-sensitively. Anything else
/// is rejected rather than allowed to flow into timestamp arithmetic.
fn resolve_time_token(token: &str) -> Result<NaiveTime, PipelineError> {
    if token.is_empty() {
        return Ok(NaiveTime::MIN);
    }
    if token.contains(':') {
        return NaiveTime::parse_from_str(token, "%H:%M")
            .map_err(|_| PipelineError::UnknownTimeToken(token.to_string()));
    }

    let clock = match token {
        "pre" | "all day" => "00:00",
        "am" => "06:00",
        "mid" => "12:00",
        "pm" => "18:00",
        _ => return Err(PipelineError::UnknownTimeToken(token.to_string())),
    };
    NaiveTime::parse_from_str(clock, "%H:%M")
        .map_err(|_| PipelineError::UnknownTimeToken(token.to_string()))
}
