//! Long-form table assembly
//!
//! Per-category outputs are computed independently and combined here in a
//! single concatenation, then stable-sorted so equal timestamps keep their
//! category-order placement.

use crate::types::AggregatedRecord;

/// Assembler for the final long-form table
pub struct LongformAssembler;

impl LongformAssembler {
    /// Concatenate per-category record runs, given in the fixed category
    /// order, and stable-sort the table ascending by datetime
    pub fn assemble(per_category: Vec<Vec<AggregatedRecord>>) -> Vec<AggregatedRecord> {
        let mut table: Vec<AggregatedRecord> = per_category.into_iter().flatten().collect();
        table.sort_by_key(|record| record.datetime);
        table
    }
}
