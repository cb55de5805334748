//! Current mortgage rates per loan-duration bucket.
//!
//! A [`RateSnapshot`] is an immutable, complete table. The shared [`RateTable`] only ever swaps
//! one snapshot for another, so a reader holding an `Arc<RateSnapshot>` keeps a consistent view
//! for as long as it needs one.

mod provider;
mod schedule;

pub use provider::{
    CsvRateProvider, FallbackRateProvider, RateProvider, RateProviderError, StaticRateProvider,
};
pub use schedule::RefreshSchedule;

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

/// Loan durations, in years, that carry a published rate.
pub const RATE_BUCKETS: [u32; 5] = [10, 15, 20, 25, 30];

/// Rate applied when a duration has no bucket of its own.
pub const FALLBACK_RATE: f64 = 0.035;

pub(crate) const DEFAULT_SOURCE: &str = "seloger.com";
pub(crate) const FALLBACK_SOURCE: &str = "fallback";

const DEFAULT_RATES: [(u32, f64); 5] = [
    (10, 0.0285),
    (15, 0.0303),
    (20, 0.0316),
    (25, 0.0326),
    (30, 0.0340),
];

/// Annual nominal rates for every bucket plus their provenance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateSnapshot {
    rates: BTreeMap<u32, f64>,
    source: String,
    last_updated: DateTime<Utc>,
}

impl RateSnapshot {
    /// Build a snapshot, rejecting tables with unknown or missing buckets.
    pub fn new(
        rates: BTreeMap<u32, f64>,
        source: impl Into<String>,
        last_updated: DateTime<Utc>,
    ) -> Result<Self, RateProviderError> {
        if let Some(duration) = rates.keys().find(|key| !RATE_BUCKETS.contains(*key)) {
            return Err(RateProviderError::UnknownBucket(*duration));
        }
        if let Some(duration) = RATE_BUCKETS.iter().find(|bucket| !rates.contains_key(*bucket)) {
            return Err(RateProviderError::MissingBucket(*duration));
        }
        if let Some((duration, rate)) = rates
            .iter()
            .find(|(_, rate)| !rate.is_finite() || **rate < 0.0)
        {
            return Err(RateProviderError::InvalidRate {
                duration: *duration,
                rate: *rate,
            });
        }

        Ok(Self {
            rates,
            source: source.into(),
            last_updated,
        })
    }

    /// The built-in table published as `seloger.com`.
    pub fn default_table(last_updated: DateTime<Utc>) -> Self {
        Self::builtin(DEFAULT_SOURCE, last_updated)
    }

    pub(crate) fn builtin(source: &str, last_updated: DateTime<Utc>) -> Self {
        Self {
            rates: DEFAULT_RATES.into_iter().collect(),
            source: source.to_string(),
            last_updated,
        }
    }

    /// Rate for an exact bucket, or [`FALLBACK_RATE`] for any other duration.
    pub fn get_rate(&self, duration_years: u32) -> f64 {
        self.rates
            .get(&duration_years)
            .copied()
            .unwrap_or(FALLBACK_RATE)
    }

    pub fn snapshot_info(&self) -> RateInfo {
        RateInfo {
            source: self.source.clone(),
            last_updated: self.last_updated,
        }
    }

    pub fn rates(&self) -> &BTreeMap<u32, f64> {
        &self.rates
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn last_updated(&self) -> DateTime<Utc> {
        self.last_updated
    }
}

/// Attribution printed next to any figure computed from a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateInfo {
    pub source: String,
    pub last_updated: DateTime<Utc>,
}

/// Shared holder of the current snapshot.
#[derive(Debug)]
pub struct RateTable {
    current: RwLock<Arc<RateSnapshot>>,
}

impl RateTable {
    pub fn new(snapshot: RateSnapshot) -> Self {
        Self {
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// Clone out the current snapshot; later swaps do not affect it.
    pub fn snapshot(&self) -> Arc<RateSnapshot> {
        let guard = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        Arc::clone(&*guard)
    }

    pub fn get_rate(&self, duration_years: u32) -> f64 {
        self.snapshot().get_rate(duration_years)
    }

    pub fn snapshot_info(&self) -> RateInfo {
        self.snapshot().snapshot_info()
    }

    /// Install `snapshot` wholesale and hand back the one it superseded.
    pub fn replace(&self, snapshot: RateSnapshot) -> Arc<RateSnapshot> {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        std::mem::replace(&mut *guard, Arc::new(snapshot))
    }

    /// Fetch from `provider` and swap on success. On failure the current snapshot stays.
    pub fn refresh<P>(
        &self,
        provider: &P,
        now: DateTime<Utc>,
    ) -> Result<Arc<RateSnapshot>, RateProviderError>
    where
        P: RateProvider + ?Sized,
    {
        info!(provider = provider.name(), "refreshing mortgage rates");
        match provider.fetch(now) {
            Ok(snapshot) => {
                let snapshot = Arc::new(snapshot);
                {
                    let mut guard = self
                        .current
                        .write()
                        .unwrap_or_else(|poisoned| poisoned.into_inner());
                    *guard = Arc::clone(&snapshot);
                }
                info!(
                    source = snapshot.source(),
                    rates = ?snapshot.rates(),
                    "mortgage rates updated"
                );
                Ok(snapshot)
            }
            Err(err) => {
                warn!(
                    provider = provider.name(),
                    error = %err,
                    "rate refresh failed; keeping previous snapshot"
                );
                Err(err)
            }
        }
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::new(RateSnapshot::default_table(Utc::now()))
    }
}
