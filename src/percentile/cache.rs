//! Lazily built, shared percentile table.

use std::sync::{Arc, Mutex, RwLock};

use crate::equity::PercentileConfig;
use crate::error::Result;
use crate::eval::{HandEvaluator, HandRanker};

use super::table::PercentileTable;

/// Owns the percentile table for the lifetime of a process.
///
/// Readers get an `Arc` snapshot; a rebuild never blocks them and publishes
/// the new table with a single swap. At most one build runs at a time.
pub struct PercentileCache<R: HandRanker = HandEvaluator> {
    config: PercentileConfig,
    ranker: R,
    table: RwLock<Option<Arc<PercentileTable>>>,
    building: Mutex<()>,
}

impl PercentileCache<HandEvaluator> {
    /// Cache using the reference evaluator.
    pub fn new(config: PercentileConfig) -> Self {
        Self::with_ranker(config, HandEvaluator::new())
    }
}

impl<R: HandRanker> PercentileCache<R> {
    /// Cache using a custom oracle.
    pub fn with_ranker(config: PercentileConfig, ranker: R) -> Self {
        Self {
            config,
            ranker,
            table: RwLock::new(None),
            building: Mutex::new(()),
        }
    }

    /// The current table, if one has been built. Never triggers a build.
    pub fn get(&self) -> Option<Arc<PercentileTable>> {
        match self.table.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// The current table, building it first if needed.
    ///
    /// Concurrent callers wait for the one build and share its result.
    pub fn get_or_build(&self) -> Result<Arc<PercentileTable>> {
        if let Some(table) = self.get() {
            return Ok(table);
        }

        let _build = self.lock_build();
        if let Some(table) = self.get() {
            return Ok(table);
        }
        self.build_and_publish()
    }

    /// Build a fresh table and swap it in.
    ///
    /// Readers keep seeing the previous table until the swap. On failure
    /// the cache is unchanged.
    pub fn rebuild(&self) -> Result<Arc<PercentileTable>> {
        let _build = self.lock_build();
        self.build_and_publish()
    }

    /// Whether a table is available.
    pub fn is_built(&self) -> bool {
        self.get().is_some()
    }

    /// Configuration used for builds.
    pub fn config(&self) -> &PercentileConfig {
        &self.config
    }

    fn lock_build(&self) -> std::sync::MutexGuard<'_, ()> {
        match self.building.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn build_and_publish(&self) -> Result<Arc<PercentileTable>> {
        let table = Arc::new(PercentileTable::build(&self.config, &self.ranker, |_, _| {})?);

        let mut slot = match self.table.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *slot = Some(Arc::clone(&table));
        log::info!("percentile table published ({} classes)", table.len());
        Ok(table)
    }
}
