use std::collections::BTreeMap;

use super::StatsError;
use crate::data::model::CanonicalTable;

// ---------------------------------------------------------------------------
// AgeDistribution – share of observations per age
// ---------------------------------------------------------------------------

/// Observation counts per distinct age, keyed in ascending order.
#[derive(Debug, Clone, PartialEq)]
pub struct AgeDistribution {
    total: usize,
    counts: BTreeMap<i32, usize>,
}

impl AgeDistribution {
    pub fn from_table(table: &CanonicalTable) -> Result<Self, StatsError> {
        if table.is_empty() {
            return Err(StatsError::EmptyTable);
        }
        let mut counts = BTreeMap::new();
        for obs in &table.rows {
            *counts.entry(obs.age).or_insert(0) += 1;
        }
        Ok(Self {
            total: table.len(),
            counts,
        })
    }

    /// Number of observations the distribution was built from.
    pub fn total(&self) -> usize {
        self.total
    }

    pub fn count(&self, age: i32) -> usize {
        self.counts.get(&age).copied().unwrap_or(0)
    }

    /// Fraction of all observations at `age`; 0 for unobserved ages.
    pub fn fraction(&self, age: i32) -> f64 {
        self.count(age) as f64 / self.total as f64
    }

    /// `(age, count)` for every observed age, ascending.
    pub fn counts(&self) -> impl Iterator<Item = (i32, usize)> + '_ {
        self.counts.iter().map(|(&age, &count)| (age, count))
    }

    /// `(age, fraction)` for every observed age, ascending.
    pub fn fractions(&self) -> impl Iterator<Item = (i32, f64)> + '_ {
        self.counts()
            .map(|(age, count)| (age, count as f64 / self.total as f64))
    }

    /// Running share of observations up to and including each age.
    ///
    /// Built from running counts, so the last value is exactly 1.0.
    pub fn cumulative(&self) -> Vec<(i32, f64)> {
        let mut running = 0;
        self.counts()
            .map(|(age, count)| {
                running += count;
                (age, running as f64 / self.total as f64)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Observation;

    fn table(ages: &[i32]) -> CanonicalTable {
        CanonicalTable {
            rows: ages
                .iter()
                .map(|&age| Observation {
                    birth_year: 2000 - age,
                    photo_taken: 2000,
                    gender: None,
                    age,
                    name: String::new(),
                })
                .collect(),
        }
    }

    #[test]
    fn fractions_are_sorted_and_sum_to_one() {
        let dist = AgeDistribution::from_table(&table(&[44, 3, 17, 17, 99, 3, 3])).unwrap();
        let ages: Vec<i32> = dist.fractions().map(|(age, _)| age).collect();
        assert_eq!(ages, vec![3, 17, 44, 99]);

        let sum: f64 = dist.fractions().map(|(_, f)| f).sum();
        assert!((sum - 1.0).abs() < 1e-12);
        assert_eq!(dist.count(3), 3);
        assert_eq!(dist.fraction(50), 0.0);
    }

    #[test]
    fn cumulative_is_monotone_and_ends_at_one() {
        let ages: Vec<i32> = (0..1000).map(|i| 1 + (i * 37) % 100).collect();
        let dist = AgeDistribution::from_table(&table(&ages)).unwrap();
        let cumulative = dist.cumulative();

        assert!(cumulative.windows(2).all(|w| w[0].1 <= w[1].1));
        assert_eq!(cumulative.last().map(|&(_, c)| c), Some(1.0));
    }

    #[test]
    fn empty_table_is_an_error() {
        assert_eq!(
            AgeDistribution::from_table(&CanonicalTable::default()),
            Err(StatsError::EmptyTable)
        );
    }
}
