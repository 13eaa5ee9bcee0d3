use log::info;

use super::model::{CanonicalTable, ExtractedTable, Observation};

/// Ages must be strictly above this.
pub const MIN_AGE_EXCLUSIVE: i32 = 0;
/// Ages must be at most this.
pub const MAX_AGE_INCLUSIVE: i32 = 100;

/// The only guard against corrupt birth dates: they show up as negative or
/// absurd ages.
pub fn is_plausible_age(age: i32) -> bool {
    age > MIN_AGE_EXCLUSIVE && age <= MAX_AGE_INCLUSIVE
}

/// Append `second` after `first`. No deduplication.
pub fn concat(first: ExtractedTable, second: ExtractedTable) -> ExtractedTable {
    let mut rows = first.rows;
    rows.extend(second.rows);
    ExtractedTable { rows }
}

/// Drop rows outside `0 < age <= 100`, keeping order.
pub fn retain_plausible(mut table: ExtractedTable) -> ExtractedTable {
    table.rows.retain(|row| is_plausible_age(row.age));
    table
}

/// Keep only the columns the reports use.
pub fn project(table: ExtractedTable) -> CanonicalTable {
    CanonicalTable {
        rows: table.rows.into_iter().map(Observation::from).collect(),
    }
}

/// Merge two sources into the canonical table.
pub fn build_canonical(first: ExtractedTable, second: ExtractedTable) -> CanonicalTable {
    let merged = concat(first, second);
    let merged_len = merged.len();
    let kept = retain_plausible(merged);
    info!(
        "Kept {} of {} merged observations with {} < age <= {}",
        kept.len(),
        merged_len,
        MIN_AGE_EXCLUSIVE,
        MAX_AGE_INCLUSIVE
    );
    project(kept)
}
