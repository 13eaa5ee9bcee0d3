use std::fmt;

use super::StatsError;
use crate::data::model::{CanonicalTable, Gender};

/// Inclusive age range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBand {
    pub low: i32,
    pub high: i32,
}

impl AgeBand {
    pub fn contains(&self, age: i32) -> bool {
        (self.low..=self.high).contains(&age)
    }
}

pub const YOUNG_ADULTS: AgeBand = AgeBand { low: 15, high: 25 };
pub const MALE_QUERY_AGE: i32 = 30;

// ---------------------------------------------------------------------------
// Age band query
// ---------------------------------------------------------------------------

/// How many observations fall inside an age band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandSummary {
    pub band: AgeBand,
    pub count: usize,
    pub total: usize,
}

impl BandSummary {
    pub fn fraction(&self) -> f64 {
        self.count as f64 / self.total as f64
    }
}

impl fmt::Display for BandSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} of the {} photos are taken between the age of {} and {} years old.",
            self.count, self.total, self.band.low, self.band.high
        )
    }
}

pub fn band_summary(table: &CanonicalTable, band: AgeBand) -> Result<BandSummary, StatsError> {
    if table.is_empty() {
        return Err(StatsError::EmptyTable);
    }
    let count = table.rows.iter().filter(|o| band.contains(o.age)).count();
    Ok(BandSummary {
        band,
        count,
        total: table.len(),
    })
}

// ---------------------------------------------------------------------------
// Gender at a given age
// ---------------------------------------------------------------------------

/// Share of all observations with one gender at one exact age.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenderAgeShare {
    pub gender: Gender,
    pub age: i32,
    pub count: usize,
    pub total: usize,
}

impl GenderAgeShare {
    pub fn percent(&self) -> f64 {
        self.count as f64 / self.total as f64 * 100.0
    }
}

impl fmt::Display for GenderAgeShare {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "The percentage of {}-year old {}s in the data set is {:.2} percent",
            self.age,
            self.gender,
            self.percent()
        )
    }
}

pub fn gender_age_share(
    table: &CanonicalTable,
    gender: Gender,
    age: i32,
) -> Result<GenderAgeShare, StatsError> {
    if table.is_empty() {
        return Err(StatsError::EmptyTable);
    }
    let count = table
        .rows
        .iter()
        .filter(|o| o.gender == Some(gender) && o.age == age)
        .count();
    Ok(GenderAgeShare {
        gender,
        age,
        count,
        total: table.len(),
    })
}
