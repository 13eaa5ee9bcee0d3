/// Data layer: archive decoding, extraction, and filtering.
///
/// Architecture:
/// ```text
///  wiki.mat          imdb.mat
///     │                 │
///     ▼                 ▼
///   ┌──────────┐     ┌──────────┐
///   │  loader   │     │  loader   │  mat → ExtractedTable (date → year, age)
///   └──────────┘     └──────────┘
///        │                │
///        └──────┬─────────┘
///               ▼
///        ┌──────────┐
///        │  filter   │  concat → 0 < age <= 100 → project
///        └──────────┘
///               │
///               ▼
///        CanonicalTable
/// ```

pub mod date;
pub mod error;
pub mod filter;
pub mod loader;
pub mod mat;
pub mod model;
