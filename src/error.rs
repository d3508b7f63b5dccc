use std::path::PathBuf;

/// Run-level errors: anything that stops the import before or outside the
/// per-row loop.
#[derive(thiserror::Error, Debug)]
pub enum ImportError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Export file not found at '{0}'")]
    ExportNotFound(PathBuf),

    #[error("Export file at '{0}' is empty or has no header row")]
    EmptyExport(PathBuf),

    #[error("Missing required columns: {}. Available columns: {}", missing.join(", "), available.join(", "))]
    MissingColumns {
        missing: Vec<String>,
        available: Vec<String>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Errors at the catalog transport boundary. Each variant names a
/// distinguishable failure kind; the row processor converts all of them
/// into a logged skip, so none of these abort a run.
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("HTTP client error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Catalog returned status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Failed to decode catalog response: {source}. Body: {body}")]
    Decode {
        source: serde_json::Error,
        body: String,
    },

    #[error("Mutation was not acknowledged by the catalog. Body: {body}")]
    Rejected { body: String },
}

pub type ImportResult<T> = Result<T, ImportError>;
pub type CatalogResult<T> = Result<T, CatalogError>;
