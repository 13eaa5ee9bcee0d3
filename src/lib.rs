//! Age statistics over the IMDB-WIKI face metadata archives.

pub mod data;
pub mod pipeline;
pub mod report;
