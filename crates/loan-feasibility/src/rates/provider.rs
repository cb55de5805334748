use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;

use super::{RateSnapshot, DEFAULT_SOURCE, FALLBACK_SOURCE};

/// Source of complete rate tables. Implementations must not hand back partial tables.
pub trait RateProvider: Send + Sync {
    fn name(&self) -> &str;
    fn fetch(&self, now: DateTime<Utc>) -> Result<RateSnapshot, RateProviderError>;
}

/// Reasons a provider could not produce a snapshot.
#[derive(Debug, thiserror::Error)]
pub enum RateProviderError {
    #[error("failed to read rate file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid rate CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("rate table has no entry for the {0}-year bucket")]
    MissingBucket(u32),
    #[error("{0} years is not a rate bucket")]
    UnknownBucket(u32),
    #[error("rate {rate} for the {duration}-year bucket is not a valid annual rate")]
    InvalidRate { duration: u32, rate: f64 },
    #[error("rate source unavailable: {0}")]
    Unavailable(String),
}

/// Publishes the fixed reference table.
#[derive(Debug, Clone)]
pub struct StaticRateProvider {
    source: String,
}

impl StaticRateProvider {
    pub fn with_source(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

impl Default for StaticRateProvider {
    fn default() -> Self {
        Self::with_source(DEFAULT_SOURCE)
    }
}

impl RateProvider for StaticRateProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self, now: DateTime<Utc>) -> Result<RateSnapshot, RateProviderError> {
        Ok(RateSnapshot::builtin(&self.source, now))
    }
}

/// Reads `duration_years,rate` rows from a CSV file on every fetch.
#[derive(Debug, Clone)]
pub struct CsvRateProvider {
    path: PathBuf,
    source: String,
}

impl CsvRateProvider {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self { path, source }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn from_reader<R: Read>(
        reader: R,
        source: &str,
        now: DateTime<Utc>,
    ) -> Result<RateSnapshot, RateProviderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut rates = BTreeMap::new();

        for row in csv_reader.deserialize::<RateRow>() {
            let row = row?;
            rates.insert(row.duration_years, row.rate);
        }

        RateSnapshot::new(rates, source, now)
    }
}

impl RateProvider for CsvRateProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, now: DateTime<Utc>) -> Result<RateSnapshot, RateProviderError> {
        let file = std::fs::File::open(&self.path)?;
        Self::from_reader(file, &self.source, now)
    }
}

#[derive(Debug, Deserialize)]
struct RateRow {
    duration_years: u32,
    rate: f64,
}

/// Substitutes the built-in table, labelled `fallback`, when the inner provider fails.
#[derive(Debug, Clone)]
pub struct FallbackRateProvider<P> {
    inner: P,
}

impl<P: RateProvider> FallbackRateProvider<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: RateProvider> RateProvider for FallbackRateProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn fetch(&self, now: DateTime<Utc>) -> Result<RateSnapshot, RateProviderError> {
        match self.inner.fetch(now) {
            Ok(snapshot) => Ok(snapshot),
            Err(err) => {
                warn!(provider = self.inner.name(), error = %err, "using fallback rate table");
                Ok(RateSnapshot::builtin(FALLBACK_SOURCE, now))
            }
        }
    }
}
