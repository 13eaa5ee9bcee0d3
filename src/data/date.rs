use chrono::{Datelike, NaiveDate};

/// MATLAB day numbers count from year 0; the proleptic Gregorian ordinal
/// (day 1 = 0001-01-01) is 366 days behind.
pub const MATLAB_EPOCH_OFFSET: i64 = 366;

/// Ordinal of 9999-12-31, the last day most date libraries can represent.
const MAX_ORDINAL: i64 = 3_652_059;

/// Convert a raw MATLAB date number into a calendar year.
///
/// Never fails: values before 0001-01-01 (including NaN) clamp to year 1 and
/// values past 9999-12-31 clamp to year 9999. The fractional part, a time of
/// day, is ignored.
pub fn birth_year(raw: f64) -> i32 {
    let day = if raw.is_nan() {
        1
    } else {
        // Saturating float-to-int cast handles the infinities.
        (raw.floor() as i64)
            .saturating_sub(MATLAB_EPOCH_OFFSET)
            .clamp(1, MAX_ORDINAL)
    };
    NaiveDate::from_num_days_from_ce_opt(day as i32).map_or(1, |date| date.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_known_date_numbers() {
        assert_eq!(birth_year(723_671.0), 1981);
        assert_eq!(birth_year(730_486.0), 2000);
        assert_eq!(birth_year(730_485.0), 1999);
        assert_eq!(birth_year(732.0), 2);
        assert_eq!(birth_year(731.0), 1);
    }

    #[test]
    fn dates_before_the_epoch_clamp_to_year_one() {
        for raw in [367.0, 366.0, 1.0, 0.0, -5_000.0, f64::NEG_INFINITY, f64::NAN] {
            assert_eq!(birth_year(raw), 1, "raw date {raw}");
        }
    }

    #[test]
    fn dates_past_year_9999_clamp() {
        assert_eq!(birth_year(1.0e12), 9999);
        assert_eq!(birth_year(f64::INFINITY), 9999);
    }

    #[test]
    fn fractional_days_are_ignored() {
        assert_eq!(birth_year(730_485.99), 1999);
    }

    #[test]
    fn year_is_non_decreasing() {
        let mut previous = birth_year(-1_000.0);
        let mut raw = -1_000.0;
        while raw < 800_000.0 {
            let year = birth_year(raw);
            assert!(year >= previous, "year dropped at raw date {raw}");
            previous = year;
            raw += 97.0;
        }
    }
}
