use std::path::Path;

use tracing_subscriber::EnvFilter;

use imdb_justwatch_import::services::import::{run, ImportMode};

/// Path to the IMDb ratings export
const EXPORT_PATH: &str = "exports/ratings.csv";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(ImportMode::Seenlist, Path::new(EXPORT_PATH)).await {
        tracing::error!(error = %e, "Seenlist import aborted during setup");
    }
}
