use std::fmt;

// ---------------------------------------------------------------------------
// Gender – the dataset's 0/1 coding
// ---------------------------------------------------------------------------

/// Gender as coded in the archives: `1` is male, `0` is female.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    /// Decode the raw archive value. Anything but exactly 0 or 1 (usually
    /// NaN) means the gender is unknown.
    pub fn from_code(code: f64) -> Option<Self> {
        if code == 1.0 {
            Some(Gender::Male)
        } else if code == 0.0 {
            Some(Gender::Female)
        } else {
            None
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Female => write!(f, "female"),
            Gender::Male => write!(f, "male"),
        }
    }
}

/// Face bounding box in image pixels: `x1, y1, x2, y2`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceLocation(pub [f64; 4]);

// ---------------------------------------------------------------------------
// ExtractedRow / ExtractedTable – one archive flattened
// ---------------------------------------------------------------------------

/// One photo observation with every archive field, `dob` already reduced to
/// a birth year.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedRow {
    pub birth_year: i32,
    pub photo_taken: i32,
    pub full_path: String,
    pub gender: Option<Gender>,
    pub name: String,
    pub face_location: Option<FaceLocation>,
    /// `-inf` when no face was detected.
    pub face_score: f64,
    pub second_face_score: Option<f64>,
    /// `photo_taken - birth_year`.
    pub age: i32,
}

/// An archive reshaped into observation rows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedTable {
    pub rows: Vec<ExtractedRow>,
}

impl ExtractedTable {
    /// Column order of the table: the 8 archive fields, then the derived age.
    pub const COLUMNS: [&'static str; 9] = [
        "dob",
        "photo_taken",
        "full_path",
        "gender",
        "name",
        "face_location",
        "face_score",
        "second_face_score",
        "age",
    ];

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Observation / CanonicalTable – what the reports consume
// ---------------------------------------------------------------------------

/// A projected row of the canonical table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Observation {
    /// Stored under the archive's `dob` column name.
    pub birth_year: i32,
    pub photo_taken: i32,
    pub gender: Option<Gender>,
    pub age: i32,
    pub name: String,
}

/// Merged and filtered observations. Every row has `0 < age <= 100`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalTable {
    pub rows: Vec<Observation>,
}

impl CanonicalTable {
    pub const COLUMNS: [&'static str; 5] = ["dob", "photo_taken", "gender", "age", "name"];

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl From<ExtractedRow> for Observation {
    fn from(row: ExtractedRow) -> Self {
        Observation {
            birth_year: row.birth_year,
            photo_taken: row.photo_taken,
            gender: row.gender,
            age: row.age,
            name: row.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gender_codes() {
        assert_eq!(Gender::from_code(1.0), Some(Gender::Male));
        assert_eq!(Gender::from_code(0.0), Some(Gender::Female));
        assert_eq!(Gender::from_code(f64::NAN), None);
        assert_eq!(Gender::from_code(0.5), None);
    }
}
