//! # Dataset Processor
//!
//! The Dataset Processor command performs the following functions:
//! * Opens a qualification container and selects a named dataset slice from
//!   the slice-configuration file.
//! * Resolves a named processing configuration and a feature extractor from
//!   the registry.
//! * Runs the feature pipeline over the selected tests, sequentially or in
//!   parallel, failing fast or skipping and recording malformed tests.
//! * Writes the assembled feature table to a CSV file, flattening vector
//!   feature columns to indexed scalar columns.
use clap::Parser;
use miette::{IntoDiagnostic, WrapErr};
use serde::de::DeserializeOwned;
use soft_sensing_features::{
    ErrorPolicy, ExtractorKind, FeaturePipeline, FeatureTable, ProcessingOptions,
};
use soft_sensing_store::{DatasetStore, TestFilter, filter_tests};
use std::{
    collections::HashMap,
    fs::File,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::info;

/// [clap] derived struct to handle command line parameters.
#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// Path to the qualification container (HDF5)
    #[clap(long)]
    dataset: PathBuf,

    /// JSON file mapping slice names to test filters
    #[clap(long)]
    slices_config: PathBuf,

    /// Name of the dataset slice to process
    #[clap(long)]
    slice: String,

    /// JSON file mapping configuration names to processing options
    #[clap(long)]
    processing_config: PathBuf,

    /// Name of the processing configuration to use
    #[clap(long)]
    config: String,

    /// Feature extractor registry key (banded_fft, raw_spectrum, time_stats)
    #[clap(long, default_value = "banded_fft")]
    method: String,

    /// Path the output CSV table is written to
    #[clap(long)]
    output: PathBuf,

    /// Skip and record failing tests instead of aborting the batch
    #[clap(long)]
    skip_failing_tests: bool,

    /// Process independent tests in parallel
    #[clap(long)]
    parallel: bool,
}

fn main() -> miette::Result<()> {
    let args = Cli::parse();

    soft_sensing_common::init_tracer();

    let filter: TestFilter = load_named(&args.slices_config, &args.slice, "slice")?;
    let options: ProcessingOptions =
        load_named(&args.processing_config, &args.config, "processing configuration")?;
    let method = ExtractorKind::from_str(&args.method)
        .map_err(|_| miette::miette!("unknown extractor \"{}\"", args.method))?;

    info!(
        dataset = %args.dataset.display(),
        slice = %args.slice,
        method = %method,
        "opening container"
    );
    let store = DatasetStore::open(&args.dataset).into_diagnostic()?;
    let tests = filter_tests(&store, &filter, None).into_diagnostic()?;
    info!(units = store.unit_count(), tests = tests.len(), "tests selected");

    let policy = if args.skip_failing_tests {
        ErrorPolicy::SkipAndRecord
    } else {
        ErrorPolicy::FailFast
    };
    let pipeline = FeaturePipeline::new(options.num_slices, method.build(&options), policy)
        .into_diagnostic()?;
    let outcome = if args.parallel {
        pipeline.process_parallel(&tests)
    } else {
        pipeline.process(&tests)
    }
    .into_diagnostic()?;

    write_csv(&outcome.table, &args.output).into_diagnostic()?;
    info!(
        rows = outcome.table.row_count(),
        skipped = outcome.skipped.len(),
        output = %args.output.display(),
        "table written"
    );
    Ok(())
}

/// Loads one named entry from a JSON file of name → configuration objects.
fn load_named<T: DeserializeOwned>(path: &Path, name: &str, what: &str) -> miette::Result<T> {
    let file = File::open(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot open {what} configuration \"{}\"", path.display()))?;
    let mut entries: HashMap<String, T> = serde_json::from_reader(file)
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot parse {what} configuration \"{}\"", path.display()))?;
    entries.remove(name).ok_or_else(|| {
        miette::miette!("unknown {what} \"{name}\" in \"{}\"", path.display())
    })
}

/// Writes the table to CSV, one scalar column per flattened feature entry.
fn write_csv(table: &FeatureTable, path: &Path) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(table.flat_columns())?;
    for index in 0..table.row_count() {
        if let Some(values) = table.flat_row(index) {
            writer.write_record(values.iter().map(|value| value.to_string()))?;
        }
    }
    writer.flush()?;
    Ok(())
}
