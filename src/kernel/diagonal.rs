//! The shared anti-diagonal walker: scratch-buffer bookkeeping and the two
//! generic recurrences (linear-gap and affine/Gotoh) that every kernel
//! flavor (Levenshtein, Needleman-Wunsch, Smith-Waterman) instantiates.
//!
//! Rather than materializing an `(|a|+1) x (|b|+1)` matrix, only three
//! rolling diagonals are kept for the main track (`d-2`, `d-1`, `d`,
//! indexed by absolute row `i` rather than position-within-diagonal — the
//! two are algebraically equivalent, and absolute-row indexing keeps the
//! recurrence's index arithmetic simple to verify), and two rolling
//! diagonals each for the affine insert/delete tracks.

use crate::error::Error;

/// A symbol a kernel can compare for equality: bytes for the byte kernels,
/// `char` for the UTF-8 code-point adapter.
pub(crate) trait Symbol: Copy + PartialEq {}
impl Symbol for u8 {}
impl Symbol for char {}

/// Which kernel flavor is being evaluated; controls the comparison
/// direction, the border formula, and how the answer is extracted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Flavor {
    /// Levenshtein: minimize, border = `gap * d`, answer = bottom-right cell.
    Distance,
    /// Needleman-Wunsch: maximize, border = `gap * d`, answer = bottom-right cell.
    GlobalAlign,
    /// Smith-Waterman: maximize, border = 0, every cell floored at 0,
    /// answer = the maximum cell ever written.
    LocalAlign,
}

impl Flavor {
    #[inline(always)]
    pub(crate) fn combine(self, a: i64, b: i64) -> i64 {
        match self {
            Flavor::Distance => a.min(b),
            Flavor::GlobalAlign | Flavor::LocalAlign => a.max(b),
        }
    }

    #[inline(always)]
    pub(crate) fn is_local(self) -> bool {
        matches!(self, Flavor::LocalAlign)
    }
}

/// A large-magnitude sentinel for "this gap track must not be chosen here".
/// Kept far from overflow so one more `open`/`extend` addition is safe.
pub(crate) const NEG_INF: i64 = i64::MIN / 4;
pub(crate) const POS_INF: i64 = i64::MAX / 4;

impl Flavor {
    /// The sentinel that loses under this flavor's `combine`: the most
    /// negative value for maximizing flavors, the most positive for
    /// `Distance`, where `combine` minimizes and a negative sentinel would
    /// otherwise always win.
    #[inline(always)]
    pub(crate) fn unreachable(self) -> i64 {
        match self {
            Flavor::Distance => POS_INF,
            Flavor::GlobalAlign | Flavor::LocalAlign => NEG_INF,
        }
    }
}

/// Rolling-diagonal scratch for one pair evaluation. Sized to
/// `max(|a|, |b|) + 2` per the spec; reused across pairs within a worker by
/// growing (never shrinking) via [`Scratch::ensure_capacity`].
pub struct Scratch {
    main: [Vec<i64>; 3],
    insert: [Vec<i64>; 2],
    delete: [Vec<i64>; 2],
}

impl Scratch {
    pub fn new() -> Self {
        Self {
            main: [Vec::new(), Vec::new(), Vec::new()],
            insert: [Vec::new(), Vec::new()],
            delete: [Vec::new(), Vec::new()],
        }
    }

    pub fn with_capacity(len: usize) -> Result<Self, Error> {
        let mut scratch = Self::new();
        scratch.ensure_capacity(len)?;
        Ok(scratch)
    }

    /// Grows every rolling buffer to at least `len` elements. Idempotent and
    /// cheap when already large enough.
    pub fn ensure_capacity(&mut self, len: usize) -> Result<(), Error> {
        for buf in self
            .main
            .iter_mut()
            .chain(self.insert.iter_mut())
            .chain(self.delete.iter_mut())
        {
            if buf.len() < len {
                let grow_by = len - buf.len();
                buf.try_reserve(grow_by).map_err(|_| Error::AllocationFailed)?;
                buf.resize(len, 0);
            }
        }
        Ok(())
    }

    #[inline(always)]
    pub(crate) fn main_get(&self, track: usize, i: usize) -> i64 {
        self.main[track][i]
    }

    #[inline(always)]
    pub(crate) fn main_set(&mut self, track: usize, i: usize, value: i64) {
        self.main[track][i] = value;
    }

    /// # Safety
    /// `i` must be in bounds for the buffer at `track`.
    #[inline(always)]
    pub(crate) unsafe fn main_get_unchecked(&self, track: usize, i: usize) -> i64 {
        *self.main[track].get_unchecked(i)
    }

    /// # Safety
    /// `i` must be in bounds for the buffer at `track`.
    #[inline(always)]
    pub(crate) unsafe fn main_set_unchecked(&mut self, track: usize, i: usize, value: i64) {
        *self.main[track].get_unchecked_mut(i) = value;
    }

    #[inline(always)]
    pub(crate) fn insert_get(&self, track: usize, i: usize) -> i64 {
        self.insert[track][i]
    }

    #[inline(always)]
    pub(crate) fn insert_set(&mut self, track: usize, i: usize, value: i64) {
        self.insert[track][i] = value;
    }

    /// # Safety
    /// `i` must be in bounds for the buffer at `track`.
    #[inline(always)]
    pub(crate) unsafe fn insert_get_unchecked(&self, track: usize, i: usize) -> i64 {
        *self.insert[track].get_unchecked(i)
    }

    /// # Safety
    /// `i` must be in bounds for the buffer at `track`.
    #[inline(always)]
    pub(crate) unsafe fn insert_set_unchecked(&mut self, track: usize, i: usize, value: i64) {
        *self.insert[track].get_unchecked_mut(i) = value;
    }

    #[inline(always)]
    pub(crate) fn delete_get(&self, track: usize, i: usize) -> i64 {
        self.delete[track][i]
    }

    #[inline(always)]
    pub(crate) fn delete_set(&mut self, track: usize, i: usize, value: i64) {
        self.delete[track][i] = value;
    }

    /// # Safety
    /// `i` must be in bounds for the buffer at `track`.
    #[inline(always)]
    pub(crate) unsafe fn delete_get_unchecked(&self, track: usize, i: usize) -> i64 {
        *self.delete[track].get_unchecked(i)
    }

    /// # Safety
    /// `i` must be in bounds for the buffer at `track`.
    #[inline(always)]
    pub(crate) unsafe fn delete_set_unchecked(&mut self, track: usize, i: usize, value: i64) {
        *self.delete[track].get_unchecked_mut(i) = value;
    }
}

impl Default for Scratch {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the linear-gap diagonal walker for one pair. `sub_cost(a_sym, b_sym)`
/// supplies the substitution cost; `gap_cost` is the per-indel cost (a
/// non-negative magnitude for [`Flavor::Distance`], a signed score delta
/// otherwise). Returns the final score/distance as `i64`; callers narrow to
/// `u32`/`i32` at the public API boundary.
pub(crate) fn diagonal_walk_linear<T: Symbol>(
    a: &[T],
    b: &[T],
    sub_cost: impl Fn(T, T) -> i32,
    gap_cost: i32,
    flavor: Flavor,
    scratch: &mut Scratch,
) -> Result<i64, Error> {
    let n = a.len();
    let m = b.len();
    let len = n.max(m) + 2;
    scratch.ensure_capacity(len)?;

    let gap_cost = gap_cost as i64;
    let clamp_zero = flavor.is_local();
    let border = |d: usize| -> i64 {
        if clamp_zero {
            0
        } else {
            gap_cost * d as i64
        }
    };

    let mut running_max = 0i64;
    let mut answer = 0i64;

    // Rotating indices into `scratch.main`: idx[0] = d-2, idx[1] = d-1, idx[2] = current.
    let mut idx = [0usize, 1, 2];

    for d in 0..=(n + m) {
        let i_lo = d.saturating_sub(m);
        let i_hi = d.min(n);

        // Fill the `current` diagonal by reading from `prev1`/`prev2` via raw
        // index lookups (single allocation reused across pairs, borrowed
        // immutably while writing a third, disjoint buffer).
        let (p2i, p1i, curi) = (idx[0], idx[1], idx[2]);
        for i in i_lo..=i_hi {
            let j = d - i;
            let value = if i == 0 || i == d {
                border(d)
            } else {
                let diag = scratch.main[p2i][i - 1] + sub_cost(a[i - 1], b[j - 1]) as i64;
                let up = scratch.main[p1i][i - 1] + gap_cost;
                let left = scratch.main[p1i][i] + gap_cost;
                flavor.combine(flavor.combine(diag, up), left)
            };
            let value = if clamp_zero { value.max(0) } else { value };
            scratch.main[curi][i] = value;
            if clamp_zero {
                running_max = running_max.max(value);
            }
            if d == n + m && i == n {
                answer = value;
            }
        }

        idx.rotate_left(1);
    }

    Ok(if clamp_zero { running_max } else { answer })
}

/// Runs the affine (Gotoh) diagonal walker for one pair. `gap_open` is paid
/// once per contiguous gap, `gap_extend` for every further residue in it.
/// Keeps the main `H` track (best overall) plus two auxiliary tracks: `E`
/// (best score ending in a gap that consumes `b`, i.e. a horizontal move)
/// and `F` (best score ending in a gap that consumes `a`, a vertical move).
/// Both auxiliary tracks only ever need the current and previous diagonal.
pub(crate) fn diagonal_walk_affine<T: Symbol>(
    a: &[T],
    b: &[T],
    sub_cost: impl Fn(T, T) -> i32,
    gap_open: i32,
    gap_extend: i32,
    flavor: Flavor,
    scratch: &mut Scratch,
) -> Result<i64, Error> {
    let n = a.len();
    let m = b.len();
    let len = n.max(m) + 2;
    scratch.ensure_capacity(len)?;

    let gap_open = gap_open as i64;
    let gap_extend = gap_extend as i64;
    let clamp_zero = flavor.is_local();
    let unreachable = flavor.unreachable();

    let mut running_max = 0i64;
    let mut answer = 0i64;

    let mut main_idx = [0usize, 1, 2];
    let mut aux_idx = [0usize, 1];

    for d in 0..=(n + m) {
        let i_lo = d.saturating_sub(m);
        let i_hi = d.min(n);

        let (p2, p1, cur) = (main_idx[0], main_idx[1], main_idx[2]);
        let (aprev, acur) = (aux_idx[0], aux_idx[1]);

        for i in i_lo..=i_hi {
            let j = d - i;

            let f_val = if i == 0 {
                unreachable
            } else {
                flavor.combine(
                    scratch.main[p1][i - 1] + gap_open,
                    scratch.delete[aprev][i - 1] + gap_extend,
                )
            };
            let e_val = if j == 0 {
                unreachable
            } else {
                flavor.combine(
                    scratch.main[p1][i] + gap_open,
                    scratch.insert[aprev][i] + gap_extend,
                )
            };
            let m_val = if i == 0 || j == 0 {
                if i == 0 && j == 0 {
                    0
                } else {
                    unreachable
                }
            } else {
                scratch.main[p2][i - 1] + sub_cost(a[i - 1], b[j - 1]) as i64
            };

            let mut h_val = flavor.combine(flavor.combine(m_val, e_val), f_val);
            if clamp_zero {
                h_val = h_val.max(0);
                running_max = running_max.max(h_val);
            }

            scratch.delete[acur][i] = f_val;
            scratch.insert[acur][i] = e_val;
            scratch.main[cur][i] = h_val;

            if d == n + m && i == n {
                answer = h_val;
            }
        }

        main_idx.rotate_left(1);
        aux_idx.rotate_left(1);
    }

    Ok(if clamp_zero { running_max } else { answer })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uniform_cost(matching: i32, mismatching: i32) -> impl Fn(u8, u8) -> i32 {
        move |a, b| if a == b { matching } else { mismatching }
    }

    #[test]
    fn linear_distance_matches_known_levenshtein() {
        let mut scratch = Scratch::new();
        let d = diagonal_walk_linear(
            b"kitten",
            b"sitting",
            uniform_cost(0, 1),
            1,
            Flavor::Distance,
            &mut scratch,
        )
        .unwrap();
        assert_eq!(d, 3);
    }

    #[test]
    fn linear_distance_identical_strings_is_zero() {
        let mut scratch = Scratch::new();
        let d = diagonal_walk_linear(
            b"abcdef",
            b"abcdef",
            uniform_cost(0, 1),
            1,
            Flavor::Distance,
            &mut scratch,
        )
        .unwrap();
        assert_eq!(d, 0);
    }

    #[test]
    fn linear_distance_against_empty_is_length() {
        let mut scratch = Scratch::new();
        let d = diagonal_walk_linear(
            b"abc",
            b"",
            uniform_cost(0, 1),
            1,
            Flavor::Distance,
            &mut scratch,
        )
        .unwrap();
        assert_eq!(d, 3);
    }

    #[test]
    fn global_align_scores_identical_strings_as_length() {
        let mut scratch = Scratch::new();
        let score = diagonal_walk_linear(
            b"abcdef",
            b"abcdef",
            uniform_cost(1, -1),
            -1,
            Flavor::GlobalAlign,
            &mut scratch,
        )
        .unwrap();
        assert_eq!(score, 6);
    }

    #[test]
    fn local_align_finds_embedded_match() {
        let mut scratch = Scratch::new();
        let score = diagonal_walk_linear(
            b"xxxabcyyy",
            b"abc",
            uniform_cost(2, -1),
            -2,
            Flavor::LocalAlign,
            &mut scratch,
        )
        .unwrap();
        assert_eq!(score, 6);
    }

    #[test]
    fn affine_collapses_to_linear_when_open_equals_extend() {
        let mut scratch_linear = Scratch::new();
        let mut scratch_affine = Scratch::new();
        let a = b"kitten";
        let b = b"sitting";

        let linear = diagonal_walk_linear(
            a,
            b,
            uniform_cost(0, 1),
            1,
            Flavor::Distance,
            &mut scratch_linear,
        )
        .unwrap();
        let affine = diagonal_walk_affine(
            a,
            b,
            uniform_cost(0, 1),
            1,
            1,
            Flavor::Distance,
            &mut scratch_affine,
        )
        .unwrap();
        assert_eq!(linear, affine);
    }

    #[test]
    fn affine_penalizes_fragmented_gaps_more_than_one_long_gap() {
        // Cheaper extend cost must never score worse than a pricier extend
        // cost for the same alignment topology.
        let mut scratch = Scratch::new();
        let cheap_extend = diagonal_walk_affine(
            b"aaaa",
            b"aaaaaa",
            uniform_cost(1, -10),
            -5,
            -1,
            Flavor::GlobalAlign,
            &mut scratch,
        )
        .unwrap();

        let mut scratch2 = Scratch::new();
        let costly_extend = diagonal_walk_affine(
            b"aaaa",
            b"aaaaaa",
            uniform_cost(1, -10),
            -5,
            -4,
            Flavor::GlobalAlign,
            &mut scratch2,
        )
        .unwrap();

        assert!(cheap_extend >= costly_extend);
    }

    #[test]
    fn local_align_affine_zero_for_disjoint_strings() {
        let mut scratch = Scratch::new();
        let score = diagonal_walk_affine(
            b"aaaa",
            b"zzzz",
            uniform_cost(1, -5),
            -5,
            -1,
            Flavor::LocalAlign,
            &mut scratch,
        )
        .unwrap();
        assert_eq!(score, 0);
    }
}
