use std::fs::File;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;

use super::distribution::AgeDistribution;

/// One line of an exported distribution.
#[derive(Debug, Serialize)]
struct DistributionRow {
    age: i32,
    count: usize,
    fraction: f64,
    cumulative: f64,
}

fn rows(dist: &AgeDistribution) -> Vec<DistributionRow> {
    dist.counts()
        .zip(dist.cumulative())
        .map(|((age, count), (_, cumulative))| DistributionRow {
            age,
            count,
            fraction: dist.fraction(age),
            cumulative,
        })
        .collect()
}

/// Write the per-age table to a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`  – header `age,count,fraction,cumulative`
/// * `.json` – `[{ "age": 20, "count": 2, "fraction": 0.5, "cumulative": 0.5 }, ...]`
pub fn export_distribution(path: &Path, dist: &AgeDistribution) -> Result<()> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => export_csv(path, dist),
        "json" => export_json(path, dist),
        other => bail!("Unsupported export extension: .{other}"),
    }
}

fn export_csv(path: &Path, dist: &AgeDistribution) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows(dist) {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn export_json(path: &Path, dist: &AgeDistribution) -> Result<()> {
    let file = File::create(path).context("creating JSON file")?;
    serde_json::to_writer_pretty(file, &rows(dist)).context("writing JSON")?;
    Ok(())
}
