use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use crate::data::filter::build_canonical;
use crate::data::loader::load_archive;
use crate::data::model::{CanonicalTable, ExtractedTable};
use crate::report::Report;

/// One archive and the struct variable to read from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSource {
    pub path: PathBuf,
    pub variable: String,
}

impl ArchiveSource {
    pub fn new(path: impl Into<PathBuf>, variable: &str) -> Self {
        Self {
            path: path.into(),
            variable: variable.to_string(),
        }
    }
}

/// The two archives, merged in this order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sources {
    pub wiki: ArchiveSource,
    pub imdb: ArchiveSource,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            wiki: ArchiveSource::new("data/wiki.mat", "wiki"),
            imdb: ArchiveSource::new("data/imdb.mat", "imdb"),
        }
    }
}

/// Rows read from one archive before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCount {
    pub variable: String,
    pub rows: usize,
}

#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub sources: Vec<SourceCount>,
    pub table: CanonicalTable,
    pub report: Report,
}

fn load(source: &ArchiveSource) -> Result<ExtractedTable> {
    load_archive(&source.path, &source.variable).with_context(|| {
        format!(
            "loading '{}' from {}",
            source.variable,
            source.path.display()
        )
    })
}

/// Extract both archives, merge and filter them, and build the report.
pub fn run(sources: &Sources) -> Result<PipelineOutput> {
    let wiki = load(&sources.wiki)?;
    let imdb = load(&sources.imdb)?;
    let counts = vec![
        SourceCount {
            variable: sources.wiki.variable.clone(),
            rows: wiki.len(),
        },
        SourceCount {
            variable: sources.imdb.variable.clone(),
            rows: imdb.len(),
        },
    ];

    let table = build_canonical(wiki, imdb);
    let report = Report::build(&table).context("building age report")?;
    info!(
        "Report ready over {} observations, {:.1}% aged {} to {}",
        table.len(),
        report.young_adults.fraction() * 100.0,
        report.young_adults.band.low,
        report.young_adults.band.high
    );

    Ok(PipelineOutput {
        sources: counts,
        table,
        report,
    })
}
