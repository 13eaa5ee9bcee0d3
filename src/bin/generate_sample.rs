use std::path::Path;

use chrono::{Datelike, NaiveDate};

use rusty_faces::data::date::MATLAB_EPOCH_OFFSET;
use rusty_faces::data::mat::writer::MatWriter;
use rusty_faces::data::mat::{CellArray, CharArray, MatValue, NumericArray, StructArray};

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform integer in `low..=high`.
    fn range(&mut self, low: i64, high: i64) -> i64 {
        low + (self.next_f64() * (high - low + 1) as f64) as i64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const FIRST_NAMES: [&str; 8] = ["Ada", "Grace", "Alan", "Edsger", "Barbara", "Ken", "Frances", "Dennis"];
const LAST_NAMES: [&str; 6] = ["Lovelace", "Hopper", "Turing", "Dijkstra", "Liskov", "Thompson"];

/// Build one archive variable with the IMDB-WIKI field layout.
fn generate_archive(rng: &mut SimpleRng, rows: usize, mean_age: f64) -> MatValue {
    let mut dob = Vec::with_capacity(rows);
    let mut photo_taken = Vec::with_capacity(rows);
    let mut full_path = Vec::with_capacity(rows);
    let mut gender = Vec::with_capacity(rows);
    let mut name = Vec::with_capacity(rows);
    let mut face_location = Vec::with_capacity(rows);
    let mut face_score = Vec::with_capacity(rows);
    let mut second_face_score = Vec::with_capacity(rows);

    for i in 0..rows {
        let taken = rng.range(1960, 2015) as i32;
        let age = rng.gauss(mean_age, 12.0).round() as i32;
        let birth = NaiveDate::from_ymd_opt(taken - age, 1, 1)
            .expect("generated year is in range")
            + chrono::Days::new(rng.range(0, 364) as u64);

        // Roughly one in fifty birth dates is corrupt, as in the real data.
        let raw_dob = if rng.next_f64() < 0.02 {
            rng.range(1, 400) as f64
        } else {
            (birth.num_days_from_ce() as i64 + MATLAB_EPOCH_OFFSET) as f64
        };

        dob.push(raw_dob);
        photo_taken.push(taken as f64);
        full_path.push(MatValue::from(CharArray::from_text(&format!(
            "{:02}/{}_{}_{}.jpg",
            i % 100,
            i,
            birth.year(),
            taken
        ))));
        gender.push(match rng.next_f64() {
            p if p < 0.05 => f64::NAN,
            p if p < 0.55 => 1.0,
            _ => 0.0,
        });
        name.push(if rng.next_f64() < 0.01 {
            MatValue::from(NumericArray::empty())
        } else {
            let first = FIRST_NAMES[rng.range(0, FIRST_NAMES.len() as i64 - 1) as usize];
            let last = LAST_NAMES[rng.range(0, LAST_NAMES.len() as i64 - 1) as usize];
            MatValue::from(CharArray::from_text(&format!("{first} {last}")))
        });
        let x = rng.range(0, 400) as f64;
        let y = rng.range(0, 400) as f64;
        let size = rng.range(40, 200) as f64;
        face_location.push(MatValue::from(NumericArray::row(vec![x, y, x + size, y + size])));
        face_score.push(if rng.next_f64() < 0.1 {
            f64::NEG_INFINITY
        } else {
            rng.gauss(3.5, 1.0)
        });
        second_face_score.push(if rng.next_f64() < 0.8 {
            f64::NAN
        } else {
            rng.gauss(1.5, 0.5)
        });
    }

    StructArray::scalar(vec![
        ("dob", NumericArray::row(dob).into()),
        ("photo_taken", NumericArray::row(photo_taken).into()),
        ("full_path", CellArray::row(full_path).into()),
        ("gender", NumericArray::row(gender).into()),
        ("name", CellArray::row(name).into()),
        ("face_location", CellArray::row(face_location).into()),
        ("face_score", NumericArray::row(face_score).into()),
        ("second_face_score", NumericArray::row(second_face_score).into()),
    ])
    .into()
}

fn write_archive(path: &Path, variable: &str, value: &MatValue) {
    let mut writer = MatWriter::new(true);
    writer.add(variable, value).expect("Failed to encode archive");
    writer.write_to(path).expect("Failed to write archive");
    println!("Wrote {variable} ({} observations) to {}", value_rows(value), path.display());
}

fn value_rows(value: &MatValue) -> usize {
    value
        .as_struct()
        .and_then(|s| s.field(0, "dob"))
        .map(MatValue::numel)
        .unwrap_or(0)
}

fn main() {
    let mut rng = SimpleRng::new(42);

    let out_dir = Path::new("data");
    std::fs::create_dir_all(out_dir).expect("Failed to create data directory");

    let wiki = generate_archive(&mut rng, 2_000, 38.0);
    write_archive(&out_dir.join("wiki.mat"), "wiki", &wiki);

    let imdb = generate_archive(&mut rng, 8_000, 35.0);
    write_archive(&out_dir.join("imdb.mat"), "imdb", &imdb);
}
