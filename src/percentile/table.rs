//! Preflop percentile table.
//!
//! Every one of the 169 starting-hand classes gets a preflop equity against
//! random opponents. Classes are then weighted by their number of concrete
//! combinations (6 pairs, 4 suited, 12 offsuit, 1,326 in total) and ranked:
//! a class's percentile is the share of all combinations with strictly lower
//! equity.

use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::cards::{HandClass, HoleCards, NUM_COMBOS, NUM_HAND_CLASSES};
use crate::equity::{PercentileConfig, Seat, Tally, TrialEngine};
use crate::error::Result;
use crate::eval::HandRanker;

/// One starting-hand class in the table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentileEntry {
    /// Hand class, serialized as its label ("AKs").
    pub hand: HandClass,
    /// Preflop equity against the configured opponents.
    pub equity: f64,
    /// Number of concrete combinations (6, 4 or 12).
    pub combos: u8,
    /// Share of all 1,326 combinations with strictly lower equity, in [0, 1).
    pub percentile: f64,
}

impl PercentileEntry {
    /// Class label, e.g. "AKs".
    pub fn label(&self) -> String {
        self.hand.label()
    }
}

/// On-disk form of the table.
#[derive(Deserialize)]
struct TableFile {
    config: PercentileConfig,
    entries: Vec<PercentileEntry>,
}

/// All 169 classes sorted by equity, best first.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "TableFile")]
pub struct PercentileTable {
    config: PercentileConfig,
    entries: Vec<PercentileEntry>,
    #[serde(skip)]
    index: FxHashMap<HandClass, usize>,
}

impl From<TableFile> for PercentileTable {
    fn from(file: TableFile) -> Self {
        Self::from_entries(file.config, file.entries)
    }
}

impl PercentileTable {
    /// Compute the equity of every class and rank them.
    ///
    /// `progress` is called with `(done, total)` after each class finishes.
    /// Classes run in parallel, and within a class the trials are split
    /// evenly across its concrete combinations.
    pub fn build<R, F>(config: &PercentileConfig, ranker: &R, progress: F) -> Result<Self>
    where
        R: HandRanker + ?Sized,
        F: Fn(usize, usize) + Sync,
    {
        config.validate()?;
        log::info!(
            "building percentile table: {} trials per class, {} opponent(s), seed {}",
            config.trials_per_class,
            config.opponents,
            config.seed
        );

        let engine = TrialEngine::new(ranker).with_batch_size(config.batch_size);
        let done = AtomicUsize::new(0);

        let equities = (0..NUM_HAND_CLASSES as u8)
            .into_par_iter()
            .map(|index| -> Result<(HandClass, f64)> {
                let class = HandClass::from_index(index);
                let equity = class_equity(&engine, config, class)?;
                let finished = done.fetch_add(1, Ordering::Relaxed) + 1;
                progress(finished, NUM_HAND_CLASSES);
                Ok((class, equity))
            })
            .collect::<Result<Vec<_>>>()?;

        let entries = equities
            .into_iter()
            .map(|(hand, equity)| PercentileEntry {
                hand,
                equity,
                combos: hand.num_combos(),
                percentile: 0.0,
            })
            .collect();

        let table = Self::from_entries(config.clone(), entries);
        log::info!(
            "percentile table built: best {} ({:.3}), worst {} ({:.3})",
            table.entries.first().map(|e| e.label()).unwrap_or_default(),
            table.entries.first().map_or(0.0, |e| e.equity),
            table.entries.last().map(|e| e.label()).unwrap_or_default(),
            table.entries.last().map_or(0.0, |e| e.equity),
        );
        Ok(table)
    }

    /// Rank entries by equity and assign percentiles.
    pub fn from_entries(config: PercentileConfig, mut entries: Vec<PercentileEntry>) -> Self {
        assign_percentiles(&mut entries);
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.hand, i))
            .collect();
        Self {
            config,
            entries,
            index,
        }
    }

    /// Configuration the table was built with.
    pub fn config(&self) -> &PercentileConfig {
        &self.config
    }

    /// The `n` strongest classes, best first.
    pub fn top(&self, n: usize) -> &[PercentileEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// The `n` weakest classes, worst first.
    pub fn bottom(&self, n: usize) -> Vec<&PercentileEntry> {
        self.entries.iter().rev().take(n).collect()
    }

    /// Look up a class by label ("AKs", "72o", "QQ"); case-insensitive.
    pub fn get(&self, label: &str) -> Option<&PercentileEntry> {
        label.parse().ok().and_then(|class| self.get_class(class))
    }

    /// Look up a class.
    pub fn get_class(&self, class: HandClass) -> Option<&PercentileEntry> {
        self.index.get(&class).map(|&i| &self.entries[i])
    }

    /// Percentile of a concrete hand.
    pub fn percentile_of(&self, hole: &HoleCards) -> Option<f64> {
        self.get_class(HandClass::of(hole)).map(|e| e.percentile)
    }

    /// Entries in the 13x13 grid: pairs on the diagonal, suited above it and
    /// offsuit below, aces in the first row and column.
    pub fn grid(&self) -> Vec<Vec<Option<&PercentileEntry>>> {
        (0..13)
            .map(|row| {
                (0..13)
                    .map(|col| self.get_class(HandClass::at_grid(row, col)))
                    .collect()
            })
            .collect()
    }

    /// Sum of combination weights (1,326 for a complete table).
    pub fn total_combos(&self) -> usize {
        self.entries.iter().map(|e| e.combos as usize).sum()
    }

    /// All entries, best first.
    pub fn entries(&self) -> &[PercentileEntry] {
        &self.entries
    }

    /// Iterate over entries, best first.
    pub fn iter(&self) -> std::slice::Iter<'_, PercentileEntry> {
        self.entries.iter()
    }

    /// Number of classes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a PercentileTable {
    type Item = &'a PercentileEntry;
    type IntoIter = std::slice::Iter<'a, PercentileEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Equity of one class, trials split evenly across its combinations.
fn class_equity<R: HandRanker + ?Sized>(
    engine: &TrialEngine<'_, R>,
    config: &PercentileConfig,
    class: HandClass,
) -> Result<f64> {
    let combos = class.enumerate_combos();
    let base = config.trials_per_class / combos.len();
    let extra = config.trials_per_class % combos.len();

    let mut seats = vec![Seat::Unseen; config.opponents + 1];
    let mut total = Tally::new(seats.len());

    for (i, combo) in combos.iter().enumerate() {
        let trials = base + usize::from(i < extra);
        if trials == 0 {
            continue;
        }
        seats[0] = Seat::Known(*combo);
        let seed = combo_seed(config.seed, class, i);
        total.merge(&engine.run(&seats, &[], &[], trials, seed)?);
    }

    Ok(total.equities()[0])
}

fn combo_seed(seed: u64, class: HandClass, combo: usize) -> u64 {
    let stream = ((class.index() as u64) << 8) | combo as u64;
    seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)
}

/// Sort best first and set each percentile to the weighted share of
/// combinations with strictly lower equity.
fn assign_percentiles(entries: &mut [PercentileEntry]) {
    entries.sort_by(|a, b| a.equity.total_cmp(&b.equity));

    let mut below = 0usize;
    let mut start = 0;
    while start < entries.len() {
        let equity = entries[start].equity;
        let end = start
            + entries[start..]
                .iter()
                .take_while(|e| e.equity == equity)
                .count();
        let percentile = below as f64 / NUM_COMBOS as f64;
        for entry in &mut entries[start..end] {
            entry.percentile = percentile;
            below += entry.combos as usize;
        }
        start = end;
    }

    entries.reverse();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eval::HandEvaluator;

    fn small_table() -> PercentileTable {
        let config = PercentileConfig::new().with_trials(2_000).with_batch_size(500);
        PercentileTable::build(&config, &HandEvaluator::new(), |_, _| {}).unwrap()
    }

    fn entry(label: &str, equity: f64) -> PercentileEntry {
        let hand: HandClass = label.parse().unwrap();
        PercentileEntry {
            hand,
            equity,
            combos: hand.num_combos(),
            percentile: 0.0,
        }
    }

    #[test]
    fn test_percentile_formula() {
        let entries = vec![
            entry("AA", 0.85),
            entry("AKs", 0.67),
            entry("72o", 0.35),
            entry("32s", 0.35),
        ];
        let table = PercentileTable::from_entries(PercentileConfig::default(), entries);

        assert_eq!(table.top(1)[0].label(), "AA");
        // AA beats 4 + 12 + 4 combos.
        assert!((table.get("AA").unwrap().percentile - 20.0 / 1326.0).abs() < 1e-12);
        assert!((table.get("AKs").unwrap().percentile - 16.0 / 1326.0).abs() < 1e-12);
        // Equal equity, equal percentile.
        assert_eq!(table.get("72o").unwrap().percentile, 0.0);
        assert_eq!(table.get("32s").unwrap().percentile, 0.0);
        assert_eq!(table.total_combos(), 26);
    }

    #[test]
    fn test_full_table_invariants() {
        let table = small_table();
        assert_eq!(table.len(), NUM_HAND_CLASSES);
        assert_eq!(table.total_combos(), NUM_COMBOS);

        // Sorted best first, and percentile never increases as equity drops.
        for pair in table.entries().windows(2) {
            assert!(pair[0].equity >= pair[1].equity);
            assert!(pair[0].percentile >= pair[1].percentile);
        }
        assert!(table.iter().all(|e| (0.0..1.0).contains(&e.percentile)));
        assert_eq!(table.bottom(1)[0].percentile, 0.0);
    }

    #[test]
    fn test_combo_weights() {
        let table = small_table();
        assert_eq!(table.get("QQ").unwrap().combos, 6);
        assert_eq!(table.get("AKs").unwrap().combos, 4);
        assert_eq!(table.get("72o").unwrap().combos, 12);
    }

    #[test]
    fn test_strong_and_weak_hands() {
        let table = small_table();
        assert_eq!(table.top(1)[0].label(), "AA");
        assert!(table.get("AA").unwrap().percentile > 0.99);
        assert!(table.get("aks").unwrap().equity > table.get("72o").unwrap().equity);

        let worst: Vec<String> = table.bottom(5).iter().map(|e| e.label()).collect();
        assert!(worst.iter().any(|l| l.ends_with('o')));
        assert!(!worst.contains(&"AA".to_string()));
    }

    #[test]
    fn test_lookups() {
        let table = small_table();
        assert!(table.get("AK").is_none());
        assert!(table.get("zz").is_none());

        let hole: HoleCards = "Ah Kh".parse().unwrap();
        assert_eq!(table.percentile_of(&hole), Some(table.get("AKs").unwrap().percentile));

        let grid = table.grid();
        assert_eq!(grid.len(), 13);
        assert_eq!(grid[0][0].unwrap().label(), "AA");
        assert_eq!(grid[0][1].unwrap().label(), "AKs");
        assert_eq!(grid[1][0].unwrap().label(), "AKo");
        assert_eq!(grid[12][12].unwrap().label(), "22");
    }

    #[test]
    fn test_build_is_reproducible() {
        let a = small_table();
        let b = small_table();
        assert_eq!(a.entries(), b.entries());
    }

    #[test]
    fn test_progress_reports_every_class() {
        let calls = AtomicUsize::new(0);
        let config = PercentileConfig::new().with_trials(50);
        PercentileTable::build(&config, &HandEvaluator::new(), |done, total| {
            assert!(done <= total);
            calls.fetch_add(1, Ordering::Relaxed);
        })
        .unwrap();
        assert_eq!(calls.load(Ordering::Relaxed), NUM_HAND_CLASSES);
    }

    #[test]
    fn test_json_roundtrip_rebuilds_index() {
        let table = PercentileTable::from_entries(
            PercentileConfig::default(),
            vec![entry("AA", 0.85), entry("72o", 0.35)],
        );
        let json = serde_json::to_string(&table).unwrap();
        let back: PercentileTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back.get("72o").unwrap().equity, 0.35);
        assert_eq!(back.entries(), table.entries());
    }
}
