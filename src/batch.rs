//! Public batch entry points: wires the tape views, cost/gap models, kernel
//! tier, and injected executor/allocator together, writing one scalar per
//! pair into a caller-provided result buffer.
//!
//! Scratch is acquired once per worker thread (a `thread_local`, lazily
//! allocated on first use and grown in place thereafter) rather than once
//! per pair, per the "scratch is thread-local, acquired once per call"
//! resource model.

use std::cell::RefCell;
use std::sync::atomic::Ordering;
use std::sync::Mutex;

use crate::cost::CostModel;
use crate::error::Error;
use crate::executor::{new_abort_flag, Executor, ScratchAllocator, SyncPtr};
use crate::gap::GapModel;
use crate::kernel::{self, Scratch, Tier};
use crate::tape::TapeView;

thread_local! {
    static SCRATCH: RefCell<Option<Scratch>> = const { RefCell::new(None) };
}

fn with_thread_local_scratch<R>(allocator: &dyn ScratchAllocator, f: impl FnOnce(&mut Scratch) -> R) -> R {
    SCRATCH.with(|cell| {
        let mut slot = cell.borrow_mut();
        if slot.is_none() {
            *slot = Some(allocator.allocate_scratch());
        }
        f(slot.as_mut().unwrap())
    })
}

fn check_preconditions(a_len: usize, b_len: usize, results_len: usize) -> Result<(), Error> {
    if a_len != b_len {
        return Err(Error::InvalidArgument(format!(
            "tape length mismatch: a has {a_len} sequences, b has {b_len}"
        )));
    }
    if results_len != a_len {
        return Err(Error::InvalidArgument(format!(
            "result buffer has capacity {results_len}, need {a_len}"
        )));
    }
    Ok(())
}

/// Runs `compute` for every pair, writing into `results[i]`. Any failure
/// (kernel inputs are always total, so in practice only scratch-growth
/// allocation failure) aborts remaining pairs; pairs already written are
/// left in place, matching the documented implementation-defined behavior.
fn run_batch<T: Copy + Send>(
    len: usize,
    executor: &dyn Executor,
    results: &mut [T],
    compute: impl Fn(usize, &mut Scratch) -> Result<T, Error> + Sync,
    allocator: &dyn ScratchAllocator,
) -> Result<(), Error> {
    let abort = new_abort_flag();
    let first_error: Mutex<Option<Error>> = Mutex::new(None);
    // SAFETY: each task writes exactly one caller-owned index and indices
    // never overlap across tasks, so a raw pointer handed to every worker
    // is sound despite not being `Sync` by default.
    let results_ptr = SyncPtr::new(results.as_mut_ptr());
    let results_len = results.len();

    let abort_ref = &*abort;
    executor.run_indexed(len, abort_ref, &|i| {
        let outcome = with_thread_local_scratch(allocator, |scratch| compute(i, scratch));
        match outcome {
            Ok(value) => {
                debug_assert!(i < results_len);
                // SAFETY: `i < len == results_len` and indices are disjoint.
                unsafe { *results_ptr.get().add(i) = value };
            }
            Err(e) => {
                *first_error.lock().unwrap() = Some(e);
                abort_ref.store(true, Ordering::Relaxed);
            }
        }
    });

    match first_error.into_inner().unwrap() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Computes the Levenshtein edit distance for every pair `(a_view[i],
/// b_view[i])`, under `cost` and `gap`. Selects the scalar or vectorized
/// kernel tier once for the whole call based on runtime CPU capability.
pub fn levenshtein_distances(
    a_view: TapeView<'_>,
    b_view: TapeView<'_>,
    results: &mut [u32],
    cost: &CostModel,
    gap: GapModel,
    executor: &dyn Executor,
    allocator: &dyn ScratchAllocator,
) -> Result<(), Error> {
    check_preconditions(a_view.len(), b_view.len(), results.len())?;
    let tier = Tier::detect();
    run_batch(
        a_view.len(),
        executor,
        results,
        |i, scratch| match tier {
            Tier::Scalar => kernel::levenshtein::distance(a_view.get(i), b_view.get(i), cost, gap, scratch),
            Tier::Vectorized => {
                kernel::levenshtein::distance_vectorized(a_view.get(i), b_view.get(i), cost, gap, scratch)
            }
        },
        allocator,
    )
}

/// UTF-8 code-point variant of [`levenshtein_distances`]. Each sequence
/// must be valid UTF-8; a pair with invalid UTF-8 fails the whole call with
/// `invalid_argument` rather than silently skipping it.
#[allow(clippy::too_many_arguments)]
pub fn levenshtein_distances_utf8(
    a_view: TapeView<'_>,
    b_view: TapeView<'_>,
    results: &mut [u32],
    matching: i32,
    mismatching: i32,
    gap: GapModel,
    executor: &dyn Executor,
    allocator: &dyn ScratchAllocator,
) -> Result<(), Error> {
    check_preconditions(a_view.len(), b_view.len(), results.len())?;
    run_batch(
        a_view.len(),
        executor,
        results,
        |i, scratch| {
            let a_str = std::str::from_utf8(a_view.get(i))
                .map_err(|_| Error::InvalidArgument(format!("sequence {i} in tape a is not valid UTF-8")))?;
            let b_str = std::str::from_utf8(b_view.get(i))
                .map_err(|_| Error::InvalidArgument(format!("sequence {i} in tape b is not valid UTF-8")))?;
            kernel::utf8::distance(a_str, b_str, matching, mismatching, gap, scratch)
        },
        allocator,
    )
}

/// Computes the Needleman-Wunsch global alignment score for every pair.
pub fn needleman_wunsch_scores(
    a_view: TapeView<'_>,
    b_view: TapeView<'_>,
    results: &mut [i32],
    cost: &CostModel,
    gap: GapModel,
    executor: &dyn Executor,
    allocator: &dyn ScratchAllocator,
) -> Result<(), Error> {
    check_preconditions(a_view.len(), b_view.len(), results.len())?;
    let tier = Tier::detect();
    run_batch(
        a_view.len(),
        executor,
        results,
        |i, scratch| match tier {
            Tier::Scalar => kernel::needleman_wunsch::score(a_view.get(i), b_view.get(i), cost, gap, scratch),
            Tier::Vectorized => {
                kernel::needleman_wunsch::score_vectorized(a_view.get(i), b_view.get(i), cost, gap, scratch)
            }
        },
        allocator,
    )
}

/// Computes the Smith-Waterman local alignment score for every pair.
pub fn smith_waterman_scores(
    a_view: TapeView<'_>,
    b_view: TapeView<'_>,
    results: &mut [i32],
    cost: &CostModel,
    gap: GapModel,
    executor: &dyn Executor,
    allocator: &dyn ScratchAllocator,
) -> Result<(), Error> {
    check_preconditions(a_view.len(), b_view.len(), results.len())?;
    let tier = Tier::detect();
    run_batch(
        a_view.len(),
        executor,
        results,
        |i, scratch| match tier {
            Tier::Scalar => kernel::smith_waterman::score(a_view.get(i), b_view.get(i), cost, gap, scratch),
            Tier::Vectorized => {
                kernel::smith_waterman::score_vectorized(a_view.get(i), b_view.get(i), cost, gap, scratch)
            }
        },
        allocator,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{InlineExecutor, RayonExecutor, SystemAllocator};
    use crate::tape::Tape;

    fn make_tape(items: &[&[u8]]) -> Tape {
        let mut tape = Tape::new();
        tape.try_assign(items.iter().copied()).unwrap();
        tape
    }

    #[test]
    fn levenshtein_batch_matches_per_pair_scalar() {
        let a = make_tape(&[b"kitten", b"LISTEN", b""]);
        let b = make_tape(&[b"sitting", b"SILENT", b"ABC"]);
        let mut results = vec![0u32; 3];
        levenshtein_distances(
            a.view(),
            b.view(),
            &mut results,
            &CostModel::default_distance(),
            GapModel::linear(1),
            &InlineExecutor,
            &SystemAllocator,
        )
        .unwrap();
        assert_eq!(results, vec![3, 4, 3]);
    }

    #[test]
    fn rejects_mismatched_tape_lengths() {
        let a = make_tape(&[b"a", b"b"]);
        let b = make_tape(&[b"a"]);
        let mut results = vec![0u32; 2];
        let err = levenshtein_distances(
            a.view(),
            b.view(),
            &mut results,
            &CostModel::default_distance(),
            GapModel::linear(1),
            &InlineExecutor,
            &SystemAllocator,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn rejects_undersized_result_buffer() {
        let a = make_tape(&[b"a", b"b"]);
        let b = make_tape(&[b"a", b"b"]);
        let mut results = vec![0u32; 1];
        let err = levenshtein_distances(
            a.view(),
            b.view(),
            &mut results,
            &CostModel::default_distance(),
            GapModel::linear(1),
            &InlineExecutor,
            &SystemAllocator,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn parallel_and_inline_executors_agree() {
        let words: Vec<&[u8]> = vec![
            b"reproducible", b"benchmarking", b"concurrency", b"allocator", b"diagonal", b"scratch", b"executor",
            b"tapedist",
        ];
        let a = make_tape(&words);
        let shifted: Vec<&[u8]> = words.iter().rev().copied().collect();
        let b = make_tape(&shifted);

        let mut inline_results = vec![0u32; words.len()];
        levenshtein_distances(
            a.view(),
            b.view(),
            &mut inline_results,
            &CostModel::default_distance(),
            GapModel::linear(1),
            &InlineExecutor,
            &SystemAllocator,
        )
        .unwrap();

        let mut parallel_results = vec![0u32; words.len()];
        levenshtein_distances(
            a.view(),
            b.view(),
            &mut parallel_results,
            &CostModel::default_distance(),
            GapModel::linear(1),
            &RayonExecutor,
            &SystemAllocator,
        )
        .unwrap();

        assert_eq!(inline_results, parallel_results);
    }

    #[test]
    fn batch_call_matches_one_pair_at_a_time() {
        let a_words: Vec<&[u8]> = vec![b"kitten", b"", b"abcdefg", b"xyz", b"reproducible"];
        let b_words: Vec<&[u8]> = vec![b"sitting", b"abc", b"abcdefg", b"", b"benchmarking"];
        let a = make_tape(&a_words);
        let b = make_tape(&b_words);

        let mut batched = vec![0u32; a_words.len()];
        levenshtein_distances(
            a.view(),
            b.view(),
            &mut batched,
            &CostModel::default_distance(),
            GapModel::linear(1),
            &InlineExecutor,
            &SystemAllocator,
        )
        .unwrap();

        let one_at_a_time: Vec<u32> = a_words
            .iter()
            .zip(b_words.iter())
            .map(|(x, y)| {
                let single_a = make_tape(&[x]);
                let single_b = make_tape(&[y]);
                let mut result = vec![0u32; 1];
                levenshtein_distances(
                    single_a.view(),
                    single_b.view(),
                    &mut result,
                    &CostModel::default_distance(),
                    GapModel::linear(1),
                    &InlineExecutor,
                    &SystemAllocator,
                )
                .unwrap();
                result[0]
            })
            .collect();

        assert_eq!(batched, one_at_a_time);
    }

    #[test]
    fn utf8_distance_matches_byte_distance_for_ascii() {
        let a = make_tape(&[b"kitten"]);
        let b = make_tape(&[b"sitting"]);
        let mut byte_results = vec![0u32; 1];
        levenshtein_distances(
            a.view(),
            b.view(),
            &mut byte_results,
            &CostModel::default_distance(),
            GapModel::linear(1),
            &InlineExecutor,
            &SystemAllocator,
        )
        .unwrap();

        let mut utf8_results = vec![0u32; 1];
        levenshtein_distances_utf8(
            a.view(),
            b.view(),
            &mut utf8_results,
            0,
            1,
            GapModel::linear(1),
            &InlineExecutor,
            &SystemAllocator,
        )
        .unwrap();

        assert_eq!(byte_results, utf8_results);
    }

    #[test]
    fn utf8_distance_rejects_invalid_utf8() {
        let a = make_tape(&[&[0xff, 0xfe][..]]);
        let b = make_tape(&[b"ab"]);
        let mut results = vec![0u32; 1];
        let err = levenshtein_distances_utf8(
            a.view(),
            b.view(),
            &mut results,
            0,
            1,
            GapModel::linear(1),
            &InlineExecutor,
            &SystemAllocator,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(_)));
    }

    #[test]
    fn needleman_wunsch_batch_scores_identical_pair_as_length() {
        use crate::cost::DenseMatrix;
        let a = make_tape(&[b"abcdefg"]);
        let b = make_tape(&[b"abcdefg"]);
        let mut results = vec![0i32; 1];
        needleman_wunsch_scores(
            a.view(),
            b.view(),
            &mut results,
            &CostModel::dense(DenseMatrix::diagonal(1, 0)),
            GapModel::linear(0),
            &InlineExecutor,
            &SystemAllocator,
        )
        .unwrap();
        assert_eq!(results, vec![7]);
    }

    #[test]
    fn smith_waterman_batch_finds_embedded_match() {
        use crate::cost::DenseMatrix;
        let a = make_tape(&[b"ABCDEFG"]);
        let b = make_tape(&[b"XXABCDEFGXX"]);
        let mut results = vec![0i32; 1];
        smith_waterman_scores(
            a.view(),
            b.view(),
            &mut results,
            &CostModel::dense(DenseMatrix::diagonal(1, 0)),
            GapModel::linear(-1),
            &InlineExecutor,
            &SystemAllocator,
        )
        .unwrap();
        assert_eq!(results, vec![7]);
    }
}
