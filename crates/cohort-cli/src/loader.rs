// crates/cohort-cli/src/loader.rs
//
// Dataset loading for the CLI: `.csv` files with a header row and `.json`
// files holding an array of flat objects.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use thiserror::Error;

use cohort_core::{CohortError, FeatureFrame};

/// Errors raised while turning a file into a `FeatureFrame`.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Unsupported dataset format for {0} (expected .csv or .json)")]
    UnsupportedFormat(String),

    #[error("Failed to open {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Frame(#[from] CohortError),
}

/// Load a dataset, choosing the parser by file extension.
pub fn load_frame(path: &Path) -> Result<FeatureFrame, LoadError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("csv") => load_csv(path),
        Some("json") => load_json(path),
        _ => Err(LoadError::UnsupportedFormat(path.display().to_string())),
    }
}

/// Load a CSV file. The first row names the columns.
pub fn load_csv(path: &Path) -> Result<FeatureFrame, LoadError> {
    let file = open(path)?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect::<Vec<String>>());
    }

    let frame = FeatureFrame::from_text_rows(&headers, &rows)?;
    tracing::debug!(
        "Loaded {} rows x {} columns from {}",
        frame.num_rows(),
        frame.num_columns(),
        path.display()
    );
    Ok(frame)
}

/// Load a JSON file holding an array of flat objects.
pub fn load_json(path: &Path) -> Result<FeatureFrame, LoadError> {
    let file = open(path)?;
    let value: serde_json::Value = serde_json::from_reader(BufReader::new(file))?;
    let records = value.as_array().ok_or_else(|| {
        CohortError::InvalidData(format!(
            "{} must contain a JSON array of records",
            path.display()
        ))
    })?;
    Ok(FeatureFrame::from_json_records(records)?)
}

fn open(path: &Path) -> Result<File, LoadError> {
    File::open(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })
}
