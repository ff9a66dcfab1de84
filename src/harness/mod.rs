//! Differential test-and-bench harness (C7): validates every kernel tier
//! and executor backend against a scalar/inline baseline, over both a fixed
//! corpus and fuzzed random pairs, logging mismatches to the stress
//! directory and counting against the stress limit.

pub mod config;
pub mod corpus;
pub mod fuzz;
pub mod stress;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use regex::Regex;
use tracing::{info, warn};

use crate::cost::CostModel;
use crate::error::Error;
use crate::executor::{Executor, InlineExecutor, RayonExecutor, SyncPtr};
use crate::gap::GapModel;
use crate::kernel::{self, Scratch};

use self::config::HarnessConfig;
use self::corpus::{load_corpus, tokenize};
use self::fuzz::{generate_batch, FuzzConfig};
use self::stress::{FailureRecord, StressLog};

/// A single named way of computing Levenshtein distance, used as one leg of
/// a differential comparison.
struct Backend {
    name: &'static str,
    executor: &'static dyn Executor,
    vectorized: bool,
}

const BACKENDS: &[Backend] = &[
    Backend { name: "scalar_inline", executor: &InlineExecutor, vectorized: false },
    Backend { name: "scalar_parallel", executor: &RayonExecutor, vectorized: false },
    Backend { name: "vectorized_inline", executor: &InlineExecutor, vectorized: true },
    Backend { name: "vectorized_parallel", executor: &RayonExecutor, vectorized: true },
];

/// Runs one backend over every pair. Kernel failures (scratch-growth
/// allocation failure is the only realistic one; see `Error::AllocationFailed`)
/// abort the remaining pairs and surface as `Err` rather than panicking —
/// this sits on the public boundary via [`Harness::run`].
fn run_backend(backend: &Backend, pairs: &[(&[u8], &[u8])]) -> Result<Vec<u32>, Error> {
    let mut results = vec![0u32; pairs.len()];
    let abort = AtomicBool::new(false);
    let cost = CostModel::default_distance();
    let gap = GapModel::linear(1);
    let results_ptr = SyncPtr::new(results.as_mut_ptr());
    let first_error: Mutex<Option<Error>> = Mutex::new(None);

    backend.executor.run_indexed(pairs.len(), &abort, &|i| {
        let (a, b) = pairs[i];
        let mut scratch = Scratch::new();
        let outcome = if backend.vectorized {
            kernel::levenshtein::distance_vectorized(a, b, &cost, gap, &mut scratch)
        } else {
            kernel::levenshtein::distance(a, b, &cost, gap, &mut scratch)
        };
        match outcome {
            Ok(value) => {
                // SAFETY: `i < pairs.len() == results.len()` and every task
                // writes a distinct index, so concurrent writes through this
                // pointer never alias.
                unsafe { *results_ptr.get().add(i) = value };
            }
            Err(e) => {
                *first_error.lock().unwrap() = Some(e);
                abort.store(true, Ordering::Relaxed);
            }
        }
    });

    match first_error.into_inner().unwrap() {
        Some(e) => Err(e),
        None => Ok(results),
    }
}

/// Summary of one [`Harness::run`] call.
#[derive(Debug, Default, Clone, Copy)]
pub struct HarnessReport {
    pub pairs_checked: usize,
    pub failures: usize,
}

pub struct Harness {
    config: HarnessConfig,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        Self { config }
    }

    /// Loads the corpus, pairs up adjacent tokens, and (if `stress_enabled`)
    /// checks every non-baseline backend against `scalar_inline` for each
    /// pair, logging and counting mismatches. Backends not matching
    /// `filter` are skipped entirely.
    pub fn run(&self) -> Result<HarnessReport, Error> {
        let raw = load_corpus(&self.config.dataset_path)?;
        let tokens = tokenize(&raw, self.config.tokenization);
        info!(tokens = tokens.len(), path = ?self.config.dataset_path, "loaded corpus");

        let mut pairs: Vec<(&[u8], &[u8])> = tokens
            .windows(2)
            .map(|w| (w[0].as_bytes(), w[1].as_bytes()))
            .collect();

        if pairs.is_empty() && !tokens.is_empty() {
            pairs.push((tokens[0].as_bytes(), tokens[0].as_bytes()));
        }

        let fuzz_config = FuzzConfig::ascii_default(64);
        let fuzz_pairs = generate_batch(&fuzz_config, self.config.seed);
        let fuzz_pairs_refs: Vec<(&[u8], &[u8])> =
            fuzz_pairs.iter().map(|(a, b)| (a.as_slice(), b.as_slice())).collect();
        pairs.extend(fuzz_pairs_refs);

        let mut report = HarnessReport::default();
        if !self.config.stress_enabled {
            info!("stress comparison disabled; skipping differential check");
            return Ok(report);
        }

        let filter = match &self.config.filter {
            Some(pattern) => Some(
                Regex::new(pattern)
                    .map_err(|e| Error::InvalidArgument(format!("invalid filter regex {pattern:?}: {e}")))?,
            ),
            None => None,
        };

        let deadline = Instant::now();
        let time_limit = Duration::from_secs(self.config.duration_seconds);

        let baseline = run_backend(&BACKENDS[0], &pairs)?;
        let mut stress_log = StressLog::new(&self.config.stress_dir, self.config.stress_limit);

        for backend in &BACKENDS[1..] {
            if deadline.elapsed() >= time_limit {
                warn!(
                    elapsed_secs = deadline.elapsed().as_secs_f64(),
                    duration_seconds = self.config.duration_seconds,
                    "duration_seconds exceeded; stopping run early"
                );
                break;
            }
            if let Some(re) = &filter {
                if !re.is_match(backend.name) {
                    continue;
                }
            }
            let observed = run_backend(backend, &pairs)?;
            for (i, (expected, actual)) in baseline.iter().zip(observed.iter()).enumerate() {
                report.pairs_checked += 1;
                if expected != actual {
                    report.failures += 1;
                    warn!(backend = backend.name, index = i, expected, actual, "differential mismatch");
                    let record = FailureRecord {
                        name: backend.name.to_string(),
                        dataset_path: self.config.dataset_path.clone(),
                        tokenization: self.config.tokenization,
                        seed: self.config.seed,
                        token_index: Some(i),
                        expected: expected.to_string(),
                        actual: actual.to_string(),
                    };
                    stress_log.record(&record, i as u64)?;
                }
            }
        }

        Ok(report)
    }
}
