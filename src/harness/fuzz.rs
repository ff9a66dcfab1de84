//! Seeded fuzz generation: the harness validates accelerated backends
//! against a scalar baseline on randomly generated pairs as well as the
//! fixed corpus. A single master seed, surfaced in [`super::config::HarnessConfig`],
//! drives every generator so failures reproduce exactly.
//!
//! Generation itself is parallel: `batch_size` pairs are split across a
//! fixed number of workers, each seeding its own thread-local `StdRng` from
//! `seed ^ worker_index`, so a given `(seed, batch_size)` always reproduces
//! bit-for-bit no matter how many workers actually ran it.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::executor::{new_abort_flag, Executor, RayonExecutor, SyncPtr};

/// Upper bound on the number of independent generator workers. Fixed rather
/// than derived from the runtime thread pool size, so the work partition
/// (and therefore the output) never depends on how many OS threads happen
/// to be available when a batch is generated.
const MAX_WORKERS: usize = 8;

/// Drives random-input generation for fuzz testing.
#[derive(Debug, Clone)]
pub struct FuzzConfig {
    /// Bytes the generator draws from.
    pub alphabet: Vec<u8>,
    /// Number of pairs to generate per batch.
    pub batch_size: usize,
    /// Inclusive lower bound on generated sequence length.
    pub min_len: usize,
    /// Inclusive upper bound on generated sequence length.
    pub max_len: usize,
}

impl FuzzConfig {
    pub fn new(alphabet: impl Into<Vec<u8>>, batch_size: usize, min_len: usize, max_len: usize) -> Self {
        assert!(min_len <= max_len, "min_len must not exceed max_len");
        Self {
            alphabet: alphabet.into(),
            batch_size,
            min_len,
            max_len,
        }
    }

    /// The default ASCII-letter alphabet used when fuzzing without a
    /// caller-supplied corpus.
    pub fn ascii_default(batch_size: usize) -> Self {
        Self::new((b'a'..=b'z').collect::<Vec<u8>>(), batch_size, 0, 64)
    }
}

/// Generates `config.batch_size` pairs of random byte sequences, seeded
/// deterministically from `seed` so the same seed always reproduces the
/// same batch regardless of how many workers draw from it. Generation runs
/// on rayon's global thread pool; see [`generate_batch_with`] to pick a
/// different executor (used by the differential tests below).
pub fn generate_batch(config: &FuzzConfig, seed: u64) -> Vec<(Vec<u8>, Vec<u8>)> {
    generate_batch_with(config, seed, &RayonExecutor)
}

/// Core of [`generate_batch`], parameterized over the executor so tests can
/// check that the inline and parallel paths agree.
pub(crate) fn generate_batch_with(
    config: &FuzzConfig,
    seed: u64,
    executor: &dyn Executor,
) -> Vec<(Vec<u8>, Vec<u8>)> {
    let batch_size = config.batch_size;
    let num_workers = batch_size.clamp(1, MAX_WORKERS);
    let bounds = chunk_bounds(batch_size, num_workers);

    let mut results: Vec<(Vec<u8>, Vec<u8>)> = Vec::with_capacity(batch_size);
    results.resize_with(batch_size, Default::default);
    // SAFETY: each worker `w` writes only to its own disjoint `[start, end)`
    // range, so handing every worker a raw pointer to the shared buffer is
    // sound; see `SyncPtr`'s contract.
    let results_ptr = SyncPtr::new(results.as_mut_ptr());

    let abort = new_abort_flag();
    executor.run_indexed(num_workers, &abort, &|w| {
        let mut rng = StdRng::seed_from_u64(seed ^ w as u64);
        let (start, end) = bounds[w];
        for i in start..end {
            let pair = (random_sequence(&mut rng, config), random_sequence(&mut rng, config));
            unsafe { *results_ptr.get().add(i) = pair };
        }
    });

    results
}

/// Splits `total` items as evenly as possible across `workers` contiguous,
/// order-preserving ranges; the first `total % workers` workers get one
/// extra item.
fn chunk_bounds(total: usize, workers: usize) -> Vec<(usize, usize)> {
    let base = total / workers;
    let remainder = total % workers;
    let mut bounds = Vec::with_capacity(workers);
    let mut start = 0;
    for w in 0..workers {
        let size = base + usize::from(w < remainder);
        bounds.push((start, start + size));
        start += size;
    }
    bounds
}

fn random_sequence(rng: &mut StdRng, config: &FuzzConfig) -> Vec<u8> {
    let len = if config.min_len == config.max_len {
        config.min_len
    } else {
        rng.gen_range(config.min_len..=config.max_len)
    };
    (0..len)
        .map(|_| config.alphabet[rng.gen_range(0..config.alphabet.len())])
        .collect()
}
