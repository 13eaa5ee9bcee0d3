use std::path::Path;

use log::info;

use super::date::birth_year;
use super::error::{ArchiveError, FormatError};
use super::mat::{self, MatValue, StructArray};
use super::model::{ExtractedRow, ExtractedTable, FaceLocation, Gender};

/// The fields every IMDB-WIKI archive variable must carry.
pub const ARCHIVE_FIELDS: [&str; 8] = [
    "dob",
    "photo_taken",
    "full_path",
    "gender",
    "name",
    "face_location",
    "face_score",
    "second_face_score",
];

// ---------------------------------------------------------------------------
// FieldSource – named access to one archive record
// ---------------------------------------------------------------------------

/// Named-field view of a raw archive record. Extraction only ever asks for
/// fields by name, so it does not depend on their order in the file.
pub trait FieldSource {
    /// Variable name, for error messages.
    fn variable(&self) -> &str;

    /// Number of fields the record carries.
    fn field_count(&self) -> usize;

    fn field(&self, name: &str) -> Option<&MatValue>;
}

/// The first element of a MAT struct variable.
pub struct StructRecord<'a> {
    variable: &'a str,
    record: &'a StructArray,
}

impl<'a> StructRecord<'a> {
    pub fn new(variable: &'a str, value: &'a MatValue) -> Result<Self, FormatError> {
        match value.as_struct() {
            Some(record) if !record.is_empty() => Ok(Self { variable, record }),
            _ => Err(FormatError::NotAStruct {
                variable: variable.to_string(),
                found: value.to_string(),
            }),
        }
    }
}

impl FieldSource for StructRecord<'_> {
    fn variable(&self) -> &str {
        self.variable
    }

    fn field_count(&self) -> usize {
        self.record.field_names.len()
    }

    fn field(&self, name: &str) -> Option<&MatValue> {
        self.record.field(0, name)
    }
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load the struct variable `variable` from the archive at `path` and reshape
/// it into one row per photo.
pub fn load_archive(path: &Path, variable: &str) -> Result<ExtractedTable, ArchiveError> {
    let value = mat::read_variable_from_file(path, variable)?;
    let record = StructRecord::new(variable, &value)?;
    let table = extract_table(&record)?;
    info!(
        "Extracted {} observations from '{}' in {}",
        table.len(),
        variable,
        path.display()
    );
    Ok(table)
}

/// Reshape a record whose fields are parallel `1×N` arrays into `N` rows.
pub fn extract_table(source: &impl FieldSource) -> Result<ExtractedTable, FormatError> {
    if source.field_count() < ARCHIVE_FIELDS.len() {
        return Err(FormatError::TooFewFields {
            variable: source.variable().to_string(),
            expected: ARCHIVE_FIELDS.len(),
            found: source.field_count(),
        });
    }

    let dob = numeric_column(source, "dob")?;
    let n = dob.len();
    let photo_taken = numeric_column(source, "photo_taken")?;
    let full_path = text_column(source, "full_path")?;
    let gender = numeric_column(source, "gender")?;
    let name = text_column(source, "name")?;
    let face_location = location_column(source, "face_location")?;
    let face_score = numeric_column(source, "face_score")?;
    let second_face_score = numeric_column(source, "second_face_score")?;

    check_len("photo_taken", n, photo_taken.len())?;
    check_len("full_path", n, full_path.len())?;
    check_len("gender", n, gender.len())?;
    check_len("name", n, name.len())?;
    check_len("face_location", n, face_location.len())?;
    check_len("face_score", n, face_score.len())?;
    check_len("second_face_score", n, second_face_score.len())?;

    let mut rows = Vec::with_capacity(n);
    for (i, (full_path, (name, face_location))) in full_path
        .into_iter()
        .zip(name.into_iter().zip(face_location))
        .enumerate()
    {
        let birth_year = birth_year(dob[i]);
        // Saturating cast and subtraction: NaN or infinite years end up
        // far outside the age filter instead of overflowing.
        let photo_taken = photo_taken[i] as i32;
        rows.push(ExtractedRow {
            birth_year,
            photo_taken,
            full_path,
            gender: Gender::from_code(gender[i]),
            name,
            face_location,
            face_score: face_score[i],
            second_face_score: Some(second_face_score[i]).filter(|s| !s.is_nan()),
            age: photo_taken.saturating_sub(birth_year),
        });
    }

    Ok(ExtractedTable { rows })
}

// ---------------------------------------------------------------------------
// Column helpers
// ---------------------------------------------------------------------------

fn require<'s>(source: &'s impl FieldSource, field: &str) -> Result<&'s MatValue, FormatError> {
    source.field(field).ok_or_else(|| FormatError::MissingField {
        variable: source.variable().to_string(),
        field: field.to_string(),
    })
}

fn unexpected(field: &str, expected: &'static str, found: &MatValue) -> FormatError {
    FormatError::UnexpectedKind {
        field: field.to_string(),
        expected,
        found: found.to_string(),
    }
}

fn check_len(field: &str, expected: usize, found: usize) -> Result<(), FormatError> {
    if expected != found {
        return Err(FormatError::RaggedColumn {
            field: field.to_string(),
            expected,
            found,
        });
    }
    Ok(())
}

fn numeric_column<'s>(source: &'s impl FieldSource, field: &str) -> Result<&'s [f64], FormatError> {
    let value = require(source, field)?;
    value
        .as_numeric()
        .map(|a| a.values.as_slice())
        .ok_or_else(|| unexpected(field, "a numeric array", value))
}

fn text_column(source: &impl FieldSource, field: &str) -> Result<Vec<String>, FormatError> {
    let value = require(source, field)?;
    let cells = value
        .as_cell()
        .ok_or_else(|| unexpected(field, "a cell array of strings", value))?;
    cells
        .cells
        .iter()
        .map(|cell| {
            cell.as_text()
                .map(str::to_string)
                .ok_or_else(|| unexpected(field, "a string cell", cell))
        })
        .collect()
}

/// Cells that are not 4-element numeric boxes become `None`.
fn location_column(source: &impl FieldSource, field: &str) -> Result<Vec<Option<FaceLocation>>, FormatError> {
    let value = require(source, field)?;
    let cells = value
        .as_cell()
        .ok_or_else(|| unexpected(field, "a cell array of boxes", value))?;
    Ok(cells
        .cells
        .iter()
        .map(|cell| {
            let values = &cell.as_numeric()?.values;
            let corners: [f64; 4] = values.as_slice().try_into().ok()?;
            Some(FaceLocation(corners))
        })
        .collect())
}
