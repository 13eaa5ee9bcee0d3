use thiserror::Error;

/// Failure while loading an archive variable.
#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("reading archive: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// The archive was readable but does not have the layout the extractor needs.
#[derive(Debug, Error, PartialEq)]
pub enum FormatError {
    #[error("not a MAT-file: {0}")]
    NotMatFile(String),

    #[error("malformed MAT data: {0}")]
    Malformed(String),

    #[error("unsupported MAT content: {0}")]
    Unsupported(String),

    #[error("variable '{0}' not found in archive")]
    MissingVariable(String),

    #[error("variable '{variable}' is a {found}, expected a non-empty struct")]
    NotAStruct { variable: String, found: String },

    #[error("variable '{variable}' has {found} fields, expected at least {expected}")]
    TooFewFields {
        variable: String,
        expected: usize,
        found: usize,
    },

    #[error("variable '{variable}' has no field '{field}'")]
    MissingField { variable: String, field: String },

    #[error("field '{field}' is a {found}, expected {expected}")]
    UnexpectedKind {
        field: String,
        expected: &'static str,
        found: String,
    },

    #[error("field '{field}' has {found} observations, expected {expected}")]
    RaggedColumn {
        field: String,
        expected: usize,
        found: usize,
    },
}
