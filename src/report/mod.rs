/// Read-only statistics over the canonical table.

pub mod distribution;
pub mod export;
pub mod query;

use thiserror::Error;

use crate::data::model::{CanonicalTable, Gender};
use distribution::AgeDistribution;
use query::{BandSummary, GenderAgeShare, MALE_QUERY_AGE, YOUNG_ADULTS};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("no observations left after filtering; shares are undefined")]
    EmptyTable,
}

/// Everything the viewer shows and prints.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub distribution: AgeDistribution,
    /// `(age, cumulative fraction)`, ascending.
    pub cumulative: Vec<(i32, f64)>,
    pub young_adults: BandSummary,
    pub males_at_30: GenderAgeShare,
}

impl Report {
    pub fn build(table: &CanonicalTable) -> Result<Self, StatsError> {
        let distribution = AgeDistribution::from_table(table)?;
        let cumulative = distribution.cumulative();
        Ok(Self {
            distribution,
            cumulative,
            young_adults: query::band_summary(table, YOUNG_ADULTS)?,
            males_at_30: query::gender_age_share(table, Gender::Male, MALE_QUERY_AGE)?,
        })
    }

    /// The two summary sentences, in print order.
    pub fn lines(&self) -> [String; 2] {
        [self.young_adults.to_string(), self.males_at_30.to_string()]
    }
}
