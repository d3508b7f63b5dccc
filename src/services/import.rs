/// Row processor and batch importer
///
/// One record at a time: map the export's type label, resolve the title
/// against the catalog, apply the mode's list mutation. Every failure mode
/// is a `RecordOutcome`, so nothing below the batch loop can abort a run.
use std::path::Path;
use std::time::Duration;

use crate::{
    config::Config,
    error::{ImportError, ImportResult},
    export,
    models::{ImportRecord, ObjectType},
    services::providers::{justwatch::JustWatchClient, CatalogClient},
};

/// Which list the run writes into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportMode {
    /// Watched-history flow: IMDb ratings export → seenlist
    Seenlist,
    /// Want-to-watch flow: IMDb watchlist export → watchlist
    Watchlist,
}

impl ImportMode {
    pub fn list_name(self) -> &'static str {
        match self {
            ImportMode::Seenlist => "seenlist",
            ImportMode::Watchlist => "watchlist",
        }
    }
}

/// Terminal state of one processed record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Type label matched neither the Movie nor the Series rule
    UnsupportedType,
    /// Search returned nothing, or the lookup failed at the transport
    NotFound,
    /// The list mutation was acknowledged
    Marked,
    /// The list mutation failed; no retry
    MutationFailed,
}

/// Aggregated counts for one run. `processed` is the headline number:
/// every record that reached the row processor, whatever its outcome.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub processed: usize,
    pub marked: usize,
    pub not_found: usize,
    pub unsupported_type: usize,
    pub mutation_failures: usize,
}

impl ImportSummary {
    fn tally(&mut self, outcome: RecordOutcome) {
        self.processed += 1;
        match outcome {
            RecordOutcome::Marked => self.marked += 1,
            RecordOutcome::NotFound => self.not_found += 1,
            RecordOutcome::UnsupportedType => self.unsupported_type += 1,
            RecordOutcome::MutationFailed => self.mutation_failures += 1,
        }
    }
}

/// Processes a single export record against the catalog.
pub async fn process_record(
    client: &dyn CatalogClient,
    mode: ImportMode,
    record: &ImportRecord,
) -> RecordOutcome {
    tracing::info!(
        title = %record.title,
        title_type = %record.title_type,
        year = %record.year,
        list = mode.list_name(),
        "Processing record"
    );

    let Some(object_type) = ObjectType::from_export_label(&record.title_type) else {
        return RecordOutcome::UnsupportedType;
    };

    // An unparsable year degrades to an unconstrained search, it is not an error
    let release_year = match record.year.parse::<i32>() {
        Ok(year) => Some(year),
        Err(_) => {
            tracing::warn!(
                title = %record.title,
                year = %record.year,
                "Invalid year format, searching without year constraint"
            );
            None
        }
    };

    let matched = match client.resolve(&record.title, object_type, release_year).await {
        Ok(Some(matched)) => matched,
        Ok(None) => {
            tracing::warn!(title = %record.title, "Title not found in catalog, skipping");
            return RecordOutcome::NotFound;
        }
        Err(e) => {
            tracing::error!(title = %record.title, error = %e, "Catalog lookup failed, skipping");
            return RecordOutcome::NotFound;
        }
    };

    let result = match mode {
        ImportMode::Seenlist => client.mark_seen(&matched.id).await,
        ImportMode::Watchlist => client.mark_watchlist(&matched.id).await,
    };

    match result {
        Ok(()) => {
            tracing::info!(
                title = %record.title,
                id = %matched.id,
                list = mode.list_name(),
                "Record imported"
            );
            RecordOutcome::Marked
        }
        Err(e) => {
            tracing::error!(
                title = %record.title,
                id = %matched.id,
                list = mode.list_name(),
                error = %e,
                "Failed to update list"
            );
            RecordOutcome::MutationFailed
        }
    }
}

/// Runs the sequential batch loop over pre-parsed export records.
///
/// Rows with an empty title are skipped without counting as processed.
/// After every row that reached the processor the loop sleeps for `delay`
/// to pace requests against the catalog.
pub async fn run_batch(
    client: &dyn CatalogClient,
    records: &[ImportRecord],
    mode: ImportMode,
    delay: Duration,
) -> ImportSummary {
    let mut summary = ImportSummary::default();

    for (index, record) in records.iter().enumerate() {
        // Header is line 1, so data row N is line N + 1
        let line = index + 2;

        if record.title.is_empty() {
            tracing::warn!(line, "Skipping row with empty title");
            continue;
        }

        let outcome = process_record(client, mode, record).await;
        summary.tally(outcome);
        tracing::debug!(line, outcome = ?outcome, delay_ms = delay.as_millis() as u64, "Row done, pacing");
        tokio::time::sleep(delay).await;
    }

    summary
}

/// Full run for one mode: config, client, export, batch, summary.
///
/// Setup failures (missing credential, missing file, missing columns) are
/// returned before any row is processed; per-row failures only ever show up
/// in the summary tallies.
pub async fn run(mode: ImportMode, export_path: &Path) -> ImportResult<ImportSummary> {
    tracing::info!(
        list = mode.list_name(),
        path = %export_path.display(),
        "Starting IMDb import"
    );

    let config = Config::from_env().map_err(|e| ImportError::Config(e.to_string()))?;
    let client = JustWatchClient::new(&config)?;

    let records = export::read_export(export_path)?;
    tracing::info!(rows = records.len(), "Export loaded");

    let summary = run_batch(&client, &records, mode, config.request_delay()).await;

    tracing::info!(
        processed = summary.processed,
        marked = summary.marked,
        not_found = summary.not_found,
        unsupported_type = summary.unsupported_type,
        mutation_failures = summary.mutation_failures,
        list = mode.list_name(),
        "Import finished"
    );

    Ok(summary)
}
