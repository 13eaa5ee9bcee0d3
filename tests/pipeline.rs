use std::path::Path;

use chrono::{Datelike, NaiveDate};

use rusty_faces::data::date::MATLAB_EPOCH_OFFSET;
use rusty_faces::data::mat::writer::MatWriter;
use rusty_faces::data::mat::{CellArray, CharArray, MatValue, NumericArray, StructArray};
use rusty_faces::data::model::CanonicalTable;
use rusty_faces::pipeline::{self, ArchiveSource, Sources};

/// Raw MATLAB date number for January 1st of `year`.
fn date_number(year: i32) -> f64 {
    let date = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
    (date.num_days_from_ce() as i64 + MATLAB_EPOCH_OFFSET) as f64
}

/// `(birth year or raw date, photo taken, gender code)` per row.
fn archive(rows: &[(f64, f64, f64)]) -> MatValue {
    let n = rows.len();
    let texts = |prefix: &str| -> MatValue {
        CellArray::row(
            (0..n)
                .map(|i| CharArray::from_text(&format!("{prefix}{i}")).into())
                .collect(),
        )
        .into()
    };
    StructArray::scalar(vec![
        ("dob", NumericArray::row(rows.iter().map(|r| r.0).collect()).into()),
        ("photo_taken", NumericArray::row(rows.iter().map(|r| r.1).collect()).into()),
        ("full_path", texts("00/photo_")),
        ("gender", NumericArray::row(rows.iter().map(|r| r.2).collect()).into()),
        ("name", texts("person ")),
        (
            "face_location",
            CellArray::row(
                (0..n)
                    .map(|_| NumericArray::row(vec![1.0, 2.0, 3.0, 4.0]).into())
                    .collect(),
            )
            .into(),
        ),
        ("face_score", NumericArray::row(vec![2.5; n]).into()),
        ("second_face_score", NumericArray::row(vec![f64::NAN; n]).into()),
    ])
    .into()
}

fn write(path: &Path, variable: &str, value: &MatValue, compress: bool) {
    let mut writer = MatWriter::new(compress);
    writer.add(variable, value).unwrap();
    writer.write_to(path).unwrap();
}

fn sources(dir: &Path) -> Sources {
    Sources {
        wiki: ArchiveSource::new(dir.join("wiki.mat"), "wiki"),
        imdb: ArchiveSource::new(dir.join("imdb.mat"), "imdb"),
    }
}

#[test]
fn default_sources_point_at_data_directory() {
    let sources = Sources::default();
    assert_eq!(sources.wiki.path, Path::new("data/wiki.mat"));
    assert_eq!(sources.wiki.variable, "wiki");
    assert_eq!(sources.imdb.path, Path::new("data/imdb.mat"));
    assert_eq!(sources.imdb.variable, "imdb");
}

#[test]
fn merges_filters_and_reports_both_archives() {
    let dir = tempfile::tempdir().unwrap();

    // wiki: ages 20, 20, plus a corrupt date and a newborn that must be dropped.
    let wiki = archive(&[
        (date_number(1990), 2010.0, 1.0),
        (date_number(1990), 2010.0, 0.0),
        (5.0, 2010.0, 1.0),
        (date_number(2010), 2010.0, 0.0),
    ]);
    // imdb: ages 30, 80, plus a 101-year-old that must be dropped.
    let imdb = archive(&[
        (date_number(1975), 2005.0, 1.0),
        (date_number(1925), 2005.0, 0.0),
        (date_number(1904), 2005.0, f64::NAN),
    ]);
    write(&dir.path().join("wiki.mat"), "wiki", &wiki, true);
    write(&dir.path().join("imdb.mat"), "imdb", &imdb, false);

    let output = pipeline::run(&sources(dir.path())).unwrap();

    let rows: Vec<usize> = output.sources.iter().map(|s| s.rows).collect();
    assert_eq!(rows, vec![4, 3]);

    let ages: Vec<i32> = output.table.rows.iter().map(|o| o.age).collect();
    assert_eq!(ages, vec![20, 20, 30, 80]);
    assert_eq!(output.table.rows[0].name, "person 0");
    assert_eq!(output.table.rows[2].birth_year, 1975);
    assert_eq!(CanonicalTable::COLUMNS, ["dob", "photo_taken", "gender", "age", "name"]);

    let fractions: Vec<(i32, f64)> = output.report.distribution.fractions().collect();
    assert_eq!(fractions, vec![(20, 0.5), (30, 0.25), (80, 0.25)]);
    assert_eq!(output.report.cumulative.last(), Some(&(80, 1.0)));

    let [band, males] = output.report.lines();
    assert_eq!(
        band,
        "2 of the 4 photos are taken between the age of 15 and 25 years old."
    );
    assert_eq!(
        males,
        "The percentage of 30-year old males in the data set is 25.00 percent"
    );
}

#[test]
fn missing_archive_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    write(
        &dir.path().join("wiki.mat"),
        "wiki",
        &archive(&[(date_number(1990), 2010.0, 1.0)]),
        true,
    );

    let err = pipeline::run(&sources(dir.path())).unwrap_err();
    assert!(format!("{err:#}").contains("loading 'imdb'"));
}

#[test]
fn archive_without_required_fields_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let thin: MatValue = StructArray::scalar(vec![
        ("dob", NumericArray::row(vec![date_number(1990)]).into()),
        ("photo_taken", NumericArray::row(vec![2010.0]).into()),
    ])
    .into();
    write(&dir.path().join("wiki.mat"), "wiki", &thin, true);
    write(
        &dir.path().join("imdb.mat"),
        "imdb",
        &archive(&[(date_number(1990), 2010.0, 1.0)]),
        true,
    );

    let err = pipeline::run(&sources(dir.path())).unwrap_err();
    assert!(format!("{err:#}").contains("expected at least 8"));
}

#[test]
fn nothing_plausible_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let corrupt = archive(&[(1.0, 2010.0, 1.0)]);
    write(&dir.path().join("wiki.mat"), "wiki", &corrupt, true);
    write(&dir.path().join("imdb.mat"), "imdb", &corrupt, true);

    let err = pipeline::run(&sources(dir.path())).unwrap_err();
    assert!(format!("{err:#}").contains("no observations left"));
}
