//! Vectorized kernel tier: the same diagonal recurrence as [`super::diagonal`],
//! with the interior of each diagonal processed in fixed-width lanes so LLVM
//! can pack the integer min/max chain into SIMD instructions on its own —
//! no nightly `std::simd`, just `#[inline(always)]` and unrolled, bounds-proven
//! indexing, matching the teacher's `dot_product_unrolled` shape.
//!
//! Border cells (the first/last cell of a diagonal, where one operand would
//! read out of the previous diagonal's bounds) are scalar-patched outside the
//! lane loop so the loop itself stays branch-free. Because the recurrence is
//! pure integer min/max, lane width cannot change the result: this tier must
//! produce bit-identical output to the scalar tier for every input.

use super::diagonal::{Flavor, Scratch, Symbol};
use crate::error::Error;

const LANES: usize = 8;

/// Vectorized counterpart to `diagonal_walk_linear`. See that function for
/// the recurrence; this one differs only in how the interior of a diagonal
/// is traversed.
pub(crate) fn diagonal_walk_linear_vectorized<T: Symbol>(
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
    let mut idx = [0usize, 1, 2];

    for d in 0..=(n + m) {
        let i_lo = d.saturating_sub(m);
        let i_hi = d.min(n);
        let (p2i, p1i, curi) = (idx[0], idx[1], idx[2]);

        // Border cells: i == i_lo when i_lo == 0, and i == i_hi when i_hi == d.
        // When the two coincide there is only a single cell on this
        // diagonal; it may still be interior (not i == 0 or i == d), e.g. at
        // the final diagonal d == n + m when the two lengths differ, so it
        // gets the ordinary recurrence rather than always being a border.
        if i_lo == i_hi {
            let i = i_lo;
            let j = d - i;
            let value = if i == 0 || i == d {
                border(d)
            } else {
                let diag = scratch.main_get(p2i, i - 1) + sub_cost(a[i - 1], b[j - 1]) as i64;
                let up = scratch.main_get(p1i, i - 1) + gap_cost;
                let left = scratch.main_get(p1i, i) + gap_cost;
                flavor.combine(flavor.combine(diag, up), left)
            };
            write_cell(scratch, curi, i, value, clamp_zero, &mut running_max);
            if d == n + m && i == n {
                answer = value;
            }
        } else {
            if i_lo == 0 {
                let value = border(d);
                write_cell(scratch, curi, 0, value, clamp_zero, &mut running_max);
                if d == n + m && n == 0 {
                    answer = value;
                }
            }
            if i_hi == d {
                let value = border(d);
                write_cell(scratch, curi, i_hi, value, clamp_zero, &mut running_max);
                if d == n + m && i_hi == n {
                    answer = value;
                }
            }
        }

        // Interior: everything strictly between the two borders just set.
        let interior_lo = if i_lo == 0 { 1 } else { i_lo };
        let interior_hi = if i_hi == d { i_hi.saturating_sub(1) } else { i_hi };
        if i_lo != i_hi && interior_lo <= interior_hi {
            let count = interior_hi - interior_lo + 1;
            let full_chunks = count / LANES;

            // SAFETY: every index touched below is `interior_lo + k` for
            // `k < full_chunks * LANES <= count`, and `interior_hi <= i_hi <=
            // min(d, n) < len`, so all of `a`, `b`, and the scratch rows stay
            // in bounds. `j = d - i` stays in `[0, m]` by the same diagonal
            // invariant the scalar walker relies on.
            for chunk in 0..full_chunks {
                let base = interior_lo + chunk * LANES;
                for lane in 0..LANES {
                    let i = base + lane;
                    let j = d - i;
                    unsafe {
                        let diag = scratch.main_get_unchecked(p2i, i - 1)
                            + sub_cost(*a.get_unchecked(i - 1), *b.get_unchecked(j - 1)) as i64;
                        let up = scratch.main_get_unchecked(p1i, i - 1) + gap_cost;
                        let left = scratch.main_get_unchecked(p1i, i) + gap_cost;
                        let mut value = flavor.combine(flavor.combine(diag, up), left);
                        if clamp_zero {
                            value = value.max(0);
                        }
                        scratch.main_set_unchecked(curi, i, value);
                        if clamp_zero {
                            running_max = running_max.max(value);
                        }
                    }
                    if d == n + m && i == n {
                        answer = scratch.main_get(curi, i);
                    }
                }
            }

            // Remainder: scalar path for the tail that doesn't fill a lane.
            for i in (interior_lo + full_chunks * LANES)..=interior_hi {
                let j = d - i;
                let diag = scratch.main_get(p2i, i - 1) + sub_cost(a[i - 1], b[j - 1]) as i64;
                let up = scratch.main_get(p1i, i - 1) + gap_cost;
                let left = scratch.main_get(p1i, i) + gap_cost;
                let value = flavor.combine(flavor.combine(diag, up), left);
                write_cell(scratch, curi, i, value, clamp_zero, &mut running_max);
                if d == n + m && i == n {
                    answer = value;
                }
            }
        }

        idx.rotate_left(1);
    }

    Ok(if clamp_zero { running_max } else { answer })
}

#[inline(always)]
fn write_cell(
    scratch: &mut Scratch,
    track: usize,
    i: usize,
    value: i64,
    clamp_zero: bool,
    running_max: &mut i64,
) {
    let value = if clamp_zero { value.max(0) } else { value };
    scratch.main_set(track, i, value);
    if clamp_zero {
        *running_max = (*running_max).max(value);
    }
}

/// Vectorized counterpart to `diagonal_walk_affine`. Carries the same two
/// auxiliary lanes (insert/delete) as the scalar Gotoh walker alongside the
/// main lane, so an affine-gap batch is lane-chunked exactly like the
/// linear-gap case instead of falling back to the scalar walker.
#[allow(clippy::too_many_arguments)]
pub(crate) fn diagonal_walk_affine_vectorized<T: Symbol>(
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

        // Single-cell diagonal: may be a true border (i == 0 or i == d) or,
        // at the final diagonal with unequal lengths, an ordinary interior
        // cell — `affine_cell` handles both via the same branches the scalar
        // walker uses.
        if i_lo == i_hi {
            let i = i_lo;
            let value = affine_cell(
                a, b, &sub_cost, gap_open, gap_extend, flavor, unreachable, scratch, p2, p1, cur, aprev, acur, d, i,
            );
            if clamp_zero {
                running_max = running_max.max(value);
            }
            if d == n + m && i == n {
                answer = value;
            }
        } else {
            if i_lo == 0 {
                let value = affine_cell(
                    a, b, &sub_cost, gap_open, gap_extend, flavor, unreachable, scratch, p2, p1, cur, aprev, acur, d,
                    0,
                );
                if clamp_zero {
                    running_max = running_max.max(value);
                }
                if d == n + m && n == 0 {
                    answer = value;
                }
            }
            if i_hi == d {
                let value = affine_cell(
                    a, b, &sub_cost, gap_open, gap_extend, flavor, unreachable, scratch, p2, p1, cur, aprev, acur, d,
                    i_hi,
                );
                if clamp_zero {
                    running_max = running_max.max(value);
                }
                if d == n + m && i_hi == n {
                    answer = value;
                }
            }
        }

        // Interior: everything strictly between the two borders just set.
        let interior_lo = if i_lo == 0 { 1 } else { i_lo };
        let interior_hi = if i_hi == d { i_hi.saturating_sub(1) } else { i_hi };
        if i_lo != i_hi && interior_lo <= interior_hi {
            let count = interior_hi - interior_lo + 1;
            let full_chunks = count / LANES;

            // SAFETY: every index touched below is `interior_lo + k` for
            // `k < full_chunks * LANES <= count`, and `interior_hi <= i_hi <=
            // min(d, n) < len`, so all of `a`, `b`, and the scratch rows stay
            // in bounds. Interior cells have `i != 0` and `j != 0` by
            // construction, so every `- 1` index is also in bounds.
            for chunk in 0..full_chunks {
                let base = interior_lo + chunk * LANES;
                for lane in 0..LANES {
                    let i = base + lane;
                    let j = d - i;
                    unsafe {
                        let f_val = flavor.combine(
                            scratch.main_get_unchecked(p1, i - 1) + gap_open,
                            scratch.delete_get_unchecked(aprev, i - 1) + gap_extend,
                        );
                        let e_val = flavor.combine(
                            scratch.main_get_unchecked(p1, i) + gap_open,
                            scratch.insert_get_unchecked(aprev, i) + gap_extend,
                        );
                        let m_val = scratch.main_get_unchecked(p2, i - 1)
                            + sub_cost(*a.get_unchecked(i - 1), *b.get_unchecked(j - 1)) as i64;
                        let mut h_val = flavor.combine(flavor.combine(m_val, e_val), f_val);
                        if clamp_zero {
                            h_val = h_val.max(0);
                            running_max = running_max.max(h_val);
                        }
                        scratch.delete_set_unchecked(acur, i, f_val);
                        scratch.insert_set_unchecked(acur, i, e_val);
                        scratch.main_set_unchecked(cur, i, h_val);
                    }
                    if d == n + m && i == n {
                        answer = scratch.main_get(cur, i);
                    }
                }
            }

            // Remainder: scalar path for the tail that doesn't fill a lane.
            for i in (interior_lo + full_chunks * LANES)..=interior_hi {
                let value = affine_cell(
                    a, b, &sub_cost, gap_open, gap_extend, flavor, unreachable, scratch, p2, p1, cur, aprev, acur, d,
                    i,
                );
                if clamp_zero {
                    running_max = running_max.max(value);
                }
                if d == n + m && i == n {
                    answer = value;
                }
            }
        }

        main_idx.rotate_left(1);
        aux_idx.rotate_left(1);
    }

    Ok(if clamp_zero { running_max } else { answer })
}

/// One cell of the Gotoh recurrence, shared by the border and scalar-remainder
/// paths of [`diagonal_walk_affine_vectorized`]. Writes the main/insert/delete
/// tracks and returns the (already clamp-applied) `H` value.
#[allow(clippy::too_many_arguments)]
#[inline(always)]
fn affine_cell<T: Symbol>(
    a: &[T],
    b: &[T],
    sub_cost: &impl Fn(T, T) -> i32,
    gap_open: i64,
    gap_extend: i64,
    flavor: Flavor,
    unreachable: i64,
    scratch: &mut Scratch,
    p2: usize,
    p1: usize,
    cur: usize,
    aprev: usize,
    acur: usize,
    d: usize,
    i: usize,
) -> i64 {
    let j = d - i;

    let f_val = if i == 0 {
        unreachable
    } else {
        flavor.combine(
            scratch.main_get(p1, i - 1) + gap_open,
            scratch.delete_get(aprev, i - 1) + gap_extend,
        )
    };
    let e_val = if j == 0 {
        unreachable
    } else {
        flavor.combine(
            scratch.main_get(p1, i) + gap_open,
            scratch.insert_get(aprev, i) + gap_extend,
        )
    };
    let m_val = if i == 0 || j == 0 {
        if i == 0 && j == 0 {
            0
        } else {
            unreachable
        }
    } else {
        scratch.main_get(p2, i - 1) + sub_cost(a[i - 1], b[j - 1]) as i64
    };

    let mut h_val = flavor.combine(flavor.combine(m_val, e_val), f_val);
    if flavor.is_local() {
        h_val = h_val.max(0);
    }

    scratch.delete_set(acur, i, f_val);
    scratch.insert_set(acur, i, e_val);
    scratch.main_set(cur, i, h_val);

    h_val
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::diagonal::diagonal_walk_linear;

    fn uniform_cost(matching: i32, mismatching: i32) -> impl Fn(u8, u8) -> i32 {
        move |a, b| if a == b { matching } else { mismatching }
    }

    fn check_matches_scalar(a: &[u8], b: &[u8], gap: i32, flavor: Flavor) {
        let mut scratch_scalar = Scratch::new();
        let mut scratch_vector = Scratch::new();
        let scalar = diagonal_walk_linear(a, b, uniform_cost(0, 1), gap, flavor, &mut scratch_scalar).unwrap();
        let vector =
            diagonal_walk_linear_vectorized(a, b, uniform_cost(0, 1), gap, flavor, &mut scratch_vector).unwrap();
        assert_eq!(scalar, vector, "tier mismatch for {:?} {:?}", a, b);
    }

    #[test]
    fn vectorized_distance_matches_scalar_on_short_inputs() {
        check_matches_scalar(b"kitten", b"sitting", 1, Flavor::Distance);
    }

    #[test]
    fn vectorized_distance_matches_scalar_on_wide_inputs() {
        // Wide enough that several full 8-lane chunks are exercised alongside
        // a non-empty scalar remainder.
        let a = b"the quick brown fox jumps over the lazy dog repeatedly".as_slice();
        let b = b"the quick brown fox jumped over a lazy doge repeat edly".as_slice();
        check_matches_scalar(a, b, 1, Flavor::Distance);
    }

    #[test]
    fn vectorized_local_align_matches_scalar() {
        check_matches_scalar(b"xxxabcdefghijklmnopqrstuvwxyzyyy", b"abcdefghijklmnopqrstuvwxyz", 1, Flavor::LocalAlign);
    }

    #[test]
    fn vectorized_empty_inputs_match_scalar() {
        check_matches_scalar(b"", b"", 1, Flavor::Distance);
        check_matches_scalar(b"abc", b"", 1, Flavor::Distance);
        check_matches_scalar(b"", b"abc", 1, Flavor::Distance);
    }

    use crate::kernel::diagonal::diagonal_walk_affine;

    fn check_affine_matches_scalar(a: &[u8], b: &[u8], open: i32, extend: i32, flavor: Flavor) {
        let mut scratch_scalar = Scratch::new();
        let mut scratch_vector = Scratch::new();
        let scalar = diagonal_walk_affine(a, b, uniform_cost(0, 1), open, extend, flavor, &mut scratch_scalar).unwrap();
        let vector = diagonal_walk_affine_vectorized(a, b, uniform_cost(0, 1), open, extend, flavor, &mut scratch_vector)
            .unwrap();
        assert_eq!(scalar, vector, "affine tier mismatch for {:?} {:?}", a, b);
    }

    #[test]
    fn affine_vectorized_distance_matches_scalar_on_short_inputs() {
        check_affine_matches_scalar(b"kitten", b"sitting", 2, 1, Flavor::Distance);
    }

    #[test]
    fn affine_vectorized_distance_matches_scalar_on_wide_inputs() {
        let a = b"the quick brown fox jumps over the lazy dog repeatedly".as_slice();
        let b = b"the quick brown fox jumped over a lazy doge repeat edly".as_slice();
        check_affine_matches_scalar(a, b, 3, 1, Flavor::Distance);
    }

    #[test]
    fn affine_vectorized_local_align_matches_scalar() {
        check_affine_matches_scalar(
            b"xxxabcdefghijklmnopqrstuvwxyzyyy",
            b"abcdefghijklmnopqrstuvwxyz",
            2,
            1,
            Flavor::LocalAlign,
        );
    }

    #[test]
    fn affine_vectorized_global_align_matches_scalar() {
        check_affine_matches_scalar(b"abcdefghijklmnopqrstuvwxyz", b"abcxyz", 2, 1, Flavor::GlobalAlign);
    }

    #[test]
    fn affine_vectorized_empty_inputs_match_scalar() {
        check_affine_matches_scalar(b"", b"", 2, 1, Flavor::Distance);
        check_affine_matches_scalar(b"abc", b"", 2, 1, Flavor::Distance);
        check_affine_matches_scalar(b"", b"abc", 2, 1, Flavor::Distance);
    }

    #[test]
    fn affine_vectorized_unequal_lengths_match_scalar() {
        check_affine_matches_scalar(b"a", b"abcdefghijklmnop", 2, 1, Flavor::Distance);
        check_affine_matches_scalar(b"abcdefghijklmnop", b"a", 2, 1, Flavor::Distance);
    }
}
